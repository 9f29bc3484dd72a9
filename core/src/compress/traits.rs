use super::types::ContextComponent;

/// Estimated token cost of a piece of text.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, text: &str) -> usize;

    /// Largest character count expected to fit `tokens`.
    fn chars_for(&self, tokens: usize) -> usize;
}

/// Fixed characters-per-token ratio, rounded up.
#[derive(Debug, Clone, Copy)]
pub struct CharRatioEstimator {
    chars_per_token: usize,
}

impl CharRatioEstimator {
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_token)
    }

    fn chars_for(&self, tokens: usize) -> usize {
        tokens.saturating_mul(self.chars_per_token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Code,
    Documentation,
}

/// Produces a structural summary of long content.
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;
    fn summarize(&self, content: &str, kind: SummaryKind) -> String;
}

/// Orders components best first. Packing consumes this order as-is.
pub trait ComponentPrioritizer: Send + Sync {
    fn name(&self) -> &str;
    fn prioritize(&self, components: Vec<ContextComponent>) -> Vec<ContextComponent>;
}
