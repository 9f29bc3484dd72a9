//! ServicesFactory implementation: builds every collaborator from config so the CLI can reuse it.
use async_trait::async_trait;
use taskloom_core::api::{AppConfig, Services, ServicesFactory};

use crate::factory;

#[derive(Debug, Default)]
pub struct PluginServicesFactory;

#[async_trait]
impl ServicesFactory for PluginServicesFactory {
    async fn build_services(&self, cfg: &AppConfig) -> anyhow::Result<Services> {
        Ok(Services {
            backend: factory::build_backend(cfg),
            worker: factory::build_worker(cfg),
            summarizer: factory::build_summarizer(cfg),
            prioritizer: factory::build_prioritizer(cfg),
            issue_search: factory::build_issue_search(cfg),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_default_services() {
        let services = PluginServicesFactory
            .build_services(&AppConfig::default())
            .await
            .unwrap();
        assert_eq!(services.backend.name(), "passthrough");
        assert_eq!(services.worker.name(), "jsonl");
        assert_eq!(services.summarizer.name(), "heuristic");
        assert_eq!(services.prioritizer.name(), "key-order");
        assert_eq!(services.issue_search.unwrap().name(), "noop");
    }
}
