use async_trait::async_trait;
use taskloom_core::api::{IssueReference, IssueSearch};

/// Offline issue search: seeded error patterns only, no external references.
#[derive(Debug, Default, Clone)]
pub struct NoopIssueSearch;

#[async_trait]
impl IssueSearch for NoopIssueSearch {
    fn name(&self) -> &str {
        "noop"
    }

    async fn search(&self, error: &str) -> anyhow::Result<Vec<IssueReference>> {
        tracing::debug!(chars = error.len(), "issue search disabled; no external lookup");
        Ok(Vec::new())
    }
}
