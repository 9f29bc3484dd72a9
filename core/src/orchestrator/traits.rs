use std::sync::Arc;

use async_trait::async_trait;

use crate::compress::{ComponentPrioritizer, CompressedContext, Summarizer};
use crate::config::AppConfig;
use crate::decompose::TaskRecord;
use crate::knowledge::IssueSearch;

/// Turns a user prompt into decomposition text (task blocks or JSON).
#[async_trait]
pub trait DecompositionBackend: Send + Sync {
    fn name(&self) -> &str;
    async fn decompose(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Executes one planned task with its compressed context.
#[async_trait]
pub trait Worker: Send + Sync {
    fn name(&self) -> &str;
    async fn execute(&self, task: &TaskRecord, context: &CompressedContext)
        -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn DecompositionBackend>,
    pub worker: Arc<dyn Worker>,
    pub summarizer: Arc<dyn Summarizer>,
    pub prioritizer: Arc<dyn ComponentPrioritizer>,
    pub issue_search: Option<Arc<dyn IssueSearch>>,
}

#[async_trait]
pub trait ServicesFactory: Send + Sync {
    async fn build_services(&self, cfg: &AppConfig) -> anyhow::Result<Services>;
}
