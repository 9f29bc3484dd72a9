mod prioritizer;
mod summarizer;

pub use prioritizer::KeyOrderPrioritizer;
pub use summarizer::HeuristicSummarizer;
