use std::sync::Arc;

use taskloom_core::api::{
    AppConfig, ComponentPrioritizer, DecompositionBackend, IssueSearch, Summarizer, Worker,
};

use crate::backend::PassthroughBackend;
use crate::compress::{HeuristicSummarizer, KeyOrderPrioritizer};
use crate::issues::NoopIssueSearch;
use crate::worker::JsonlWorker;

pub fn build_backend(_cfg: &AppConfig) -> Arc<dyn DecompositionBackend> {
    Arc::new(PassthroughBackend)
}

pub fn build_worker(_cfg: &AppConfig) -> Arc<dyn Worker> {
    Arc::new(JsonlWorker::stdout())
}

pub fn build_summarizer(_cfg: &AppConfig) -> Arc<dyn Summarizer> {
    Arc::new(HeuristicSummarizer)
}

pub fn build_prioritizer(_cfg: &AppConfig) -> Arc<dyn ComponentPrioritizer> {
    Arc::new(KeyOrderPrioritizer::default())
}

pub fn build_issue_search(_cfg: &AppConfig) -> Option<Arc<dyn IssueSearch>> {
    Some(Arc::new(NoopIssueSearch))
}
