use taskloom_core::api::{ComponentPrioritizer, ContextComponent};

const DEFAULT_ORDER: [&str; 3] = ["code", "dependencies", "documentation"];

/// Orders components by a fixed kind list; unlisted kinds follow in their
/// original order.
#[derive(Debug, Clone)]
pub struct KeyOrderPrioritizer {
    order: Vec<String>,
}

impl KeyOrderPrioritizer {
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
        }
    }

    fn rank(&self, kind: &str) -> usize {
        self.order
            .iter()
            .position(|k| k == kind)
            .unwrap_or(self.order.len())
    }
}

impl Default for KeyOrderPrioritizer {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}

impl ComponentPrioritizer for KeyOrderPrioritizer {
    fn name(&self) -> &str {
        "key-order"
    }

    fn prioritize(&self, mut components: Vec<ContextComponent>) -> Vec<ContextComponent> {
        components.sort_by_key(|c| self.rank(c.kind()));
        components
    }
}
