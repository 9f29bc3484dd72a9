//! Token-budgeted context compression.
//!
//! ```text
//! context object
//!   ├─ essential keys ─────────────► kept verbatim, cost charged first
//!   └─ other keys ─► components ─► prioritizer ─► greedy packing
//!                                                  ├─ fits: verbatim
//!                                                  ├─ compressible: compressed, stop
//!                                                  └─ otherwise: dropped
//! ```

mod strategy;
mod traits;
mod types;

use std::sync::Arc;

use serde_json::Value;

use crate::config::CompressorConfig;

use strategy::{estimate_payload, Strategies};
pub use traits::{CharRatioEstimator, ComponentPrioritizer, Summarizer, SummaryKind, TokenEstimator};
pub use types::{
    ComponentPayload, CompressedContext, ContextComponent, DependencyItem, EssentialMetadata,
    ESSENTIAL_KEYS,
};

pub struct ContextCompressor {
    config: CompressorConfig,
    estimator: Arc<dyn TokenEstimator>,
    summarizer: Arc<dyn Summarizer>,
    prioritizer: Arc<dyn ComponentPrioritizer>,
}

impl ContextCompressor {
    pub fn new(
        config: CompressorConfig,
        summarizer: Arc<dyn Summarizer>,
        prioritizer: Arc<dyn ComponentPrioritizer>,
    ) -> Self {
        let estimator = Arc::new(CharRatioEstimator::new(config.chars_per_token));
        Self {
            config,
            estimator,
            summarizer,
            prioritizer,
        }
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn default_budget(&self) -> usize {
        self.config.max_tokens
    }

    /// Splits a context object into essential metadata and prioritized
    /// components with their estimated costs.
    pub fn components(&self, context: &Value) -> (EssentialMetadata, Vec<ContextComponent>) {
        let Some(map) = context.as_object() else {
            let payload = ComponentPayload::Other {
                kind: "context".to_string(),
                payload: context.clone(),
            };
            return (EssentialMetadata::default(), vec![self.component("context", payload)]);
        };

        let essential = EssentialMetadata::from_context(map);
        let components = map
            .iter()
            .filter(|(key, _)| !ESSENTIAL_KEYS.contains(&key.as_str()))
            .map(|(key, value)| self.component(key, ComponentPayload::from_entry(key, value)))
            .collect();
        (essential, self.prioritizer.prioritize(components))
    }

    fn component(&self, key: &str, payload: ComponentPayload) -> ContextComponent {
        ContextComponent {
            key: key.to_string(),
            estimated_tokens: estimate_payload(self.estimator.as_ref(), &payload),
            payload,
            is_compressed: false,
        }
    }

    /// Packs `context` into `max_tokens` (config default when `None`).
    pub fn compress(&self, context: &Value, max_tokens: Option<usize>) -> CompressedContext {
        let budget = max_tokens.unwrap_or(self.config.max_tokens);
        let (essential, components) = self.components(context);

        let essential_tokens = if essential.is_empty() {
            0
        } else {
            serde_json::to_string(&essential)
                .map(|s| self.estimator.estimate(&s))
                .unwrap_or(0)
        };

        let mut out = CompressedContext {
            essential,
            essential_tokens,
            ..Default::default()
        };

        let mut remaining = match budget.checked_sub(essential_tokens) {
            Some(rest) => rest,
            None => {
                tracing::warn!(
                    budget,
                    essential_tokens,
                    "essential metadata exceeds token budget; packing nothing else"
                );
                out.budget_exceeded = true;
                0
            }
        };

        let strategies = Strategies {
            estimator: self.estimator.as_ref(),
            summarizer: self.summarizer.as_ref(),
            dependency_item_cost: self.config.dependency_item_cost,
        };

        let mut pending = components.into_iter();
        for component in pending.by_ref() {
            if component.estimated_tokens <= remaining {
                remaining -= component.estimated_tokens;
                out.components.push(component);
                continue;
            }
            match strategies.compress(&component, remaining) {
                Some(compressed) => {
                    tracing::debug!(
                        key = %compressed.key,
                        from = component.estimated_tokens,
                        to = compressed.estimated_tokens,
                        "component compressed; packing stops"
                    );
                    out.components.push(compressed);
                    break;
                }
                None => {
                    tracing::debug!(
                        key = %component.key,
                        kind = component.kind(),
                        remaining,
                        "compression declined; component dropped"
                    );
                    out.dropped.push(component.key);
                }
            }
        }
        out.dropped.extend(pending.map(|c| c.key));

        out.total_tokens = out.essential_tokens + out.component_tokens();
        tracing::debug!(
            budget,
            total_tokens = out.total_tokens,
            components = out.components.len(),
            dropped = out.dropped.len(),
            "context compressed"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    struct FirstLine;

    impl Summarizer for FirstLine {
        fn name(&self) -> &str {
            "first-line"
        }

        fn summarize(&self, content: &str, _kind: SummaryKind) -> String {
            content.lines().next().unwrap_or_default().to_string()
        }
    }

    struct KeyOrder(&'static [&'static str]);

    impl ComponentPrioritizer for KeyOrder {
        fn name(&self) -> &str {
            "key-order"
        }

        fn prioritize(&self, mut components: Vec<ContextComponent>) -> Vec<ContextComponent> {
            let rank = |key: &str| self.0.iter().position(|k| *k == key).unwrap_or(self.0.len());
            components.sort_by_key(|c| rank(&c.key));
            components
        }
    }

    fn compressor(order: &'static [&'static str]) -> ContextCompressor {
        ContextCompressor::new(
            CompressorConfig::default(),
            Arc::new(FirstLine),
            Arc::new(KeyOrder(order)),
        )
    }

    fn long_code() -> String {
        format!("pub fn build_index(root: &Path) -> Index {{\n{}\n}}", "    step();\n".repeat(400))
    }

    #[test]
    fn small_context_is_kept_verbatim() {
        let ctx = json!({
            "userId": "u-1",
            "timestamp": "2024-01-01T00:00:00Z",
            "code": "fn main() {}",
            "documentation": "Runs the thing."
        });
        let out = compressor(&["code", "documentation"]).compress(&ctx, None);

        assert_eq!(out.essential.user_id, Some(json!("u-1")));
        assert_eq!(out.components.len(), 2);
        assert!(out.components.iter().all(|c| !c.is_compressed));
        assert!(out.dropped.is_empty());
        assert!(!out.budget_exceeded);
        assert!(out.total_tokens <= 2000);
    }

    #[test]
    fn packing_stops_after_first_compression() {
        let ctx = json!({
            "code": long_code(),
            "documentation": "short",
        });
        let out = compressor(&["code", "documentation"]).compress(&ctx, Some(200));

        assert_eq!(out.components.len(), 1);
        assert!(out.components[0].is_compressed);
        assert_eq!(out.dropped, vec!["documentation".to_string()]);
        assert!(out.component_tokens() <= 200);
    }

    #[test]
    fn declined_components_are_skipped() {
        let history = vec!["a long transcript line"; 200];
        let ctx = json!({
            "history": history,
            "documentation": "short",
        });
        let out = compressor(&["history", "documentation"]).compress(&ctx, Some(100));

        assert_eq!(out.dropped, vec!["history".to_string()]);
        assert_eq!(out.components.len(), 1);
        assert_eq!(out.components[0].key, "documentation");
        assert!(!out.components[0].is_compressed);
    }

    #[test]
    fn overflowing_dependencies_keep_top_items() {
        let deps: Vec<_> = (0..10)
            .map(|i| {
                json!({
                    "name": format!("dependency-with-a-rather-long-registry-name-for-testing-number-{i:02}"),
                    "version": "1.0.0",
                    "importance": i,
                })
            })
            .collect();
        let ctx = json!({ "dependencies": deps });
        let out = compressor(&["dependencies"]).compress(&ctx, Some(200));

        let ComponentPayload::Dependencies { items, total_count } = &out.components[0].payload
        else {
            panic!("expected dependencies");
        };
        assert!(items.len() <= 4);
        assert_eq!(*total_count, Some(10));
        assert!(items[0].name.ends_with("09"));
        assert!(out.total_tokens <= 200);
    }

    #[test]
    fn essential_overflow_is_flagged() {
        let ctx = json!({
            "userId": "someone-with-a-very-long-identifier",
            "projectType": "monorepo",
            "code": "fn main() {}",
        });
        let out = compressor(&["code"]).compress(&ctx, Some(5));

        assert!(out.budget_exceeded);
        assert!(out.components.is_empty());
        assert_eq!(out.dropped, vec!["code".to_string()]);
        assert_eq!(out.essential.project_type, Some(json!("monorepo")));
    }

    #[test]
    fn component_cost_stays_within_remaining_budget() {
        let ctx = json!({
            "userId": "u-1",
            "requestType": "review",
            "code": long_code(),
            "documentation": "# Guide\nLots of text here.",
            "dependencies": ["tokio", "serde", "tracing"],
        });
        for budget in [0usize, 10, 40, 120, 400, 5000] {
            let out = compressor(&["code", "dependencies", "documentation"])
                .compress(&ctx, Some(budget));
            if !out.budget_exceeded {
                assert!(
                    out.component_tokens() <= budget - out.essential_tokens,
                    "budget {budget}"
                );
            }
        }
    }

    #[test]
    fn scalar_context_becomes_single_component() {
        let out = compressor(&[]).compress(&json!("just text"), None);
        assert!(out.essential.is_empty());
        assert_eq!(out.components[0].key, "context");
    }
}
