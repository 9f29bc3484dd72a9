//! One orchestration run: backend decomposition, planning, then per task a
//! relevance query, context compression and worker dispatch with retries.

mod context;
mod run;
mod traits;
mod types;

pub use context::build_task_context;
pub use run::Orchestrator;
pub use traits::{DecompositionBackend, Services, ServicesFactory, Worker};
pub use types::{RunReport, RunRequest, TaskOutcome};

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::compress::{
        ComponentPrioritizer, CompressedContext, ContextComponent, Summarizer, SummaryKind,
    };
    use crate::config::AppConfig;
    use crate::decompose::{TaskRecord, TaskStatus};
    use crate::error::ErrorCode;
    use crate::knowledge::{IssueReference, IssueSearch, KnowledgeGraphService, ProjectScan};

    struct FixedBackend(&'static str);

    #[async_trait]
    impl DecompositionBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn decompose(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct DownBackend;

    #[async_trait]
    impl DecompositionBackend for DownBackend {
        fn name(&self) -> &str {
            "down"
        }

        async fn decompose(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("backend unavailable")
        }
    }

    /// Fails each task a configured number of times before succeeding.
    #[derive(Default)]
    struct ScriptedWorker {
        failures: Mutex<HashMap<String, u32>>,
        calls: Mutex<Vec<String>>,
        contexts: Mutex<Vec<CompressedContext>>,
    }

    impl ScriptedWorker {
        fn failing(task_id: &str, times: u32) -> Self {
            let worker = Self::default();
            worker.failures.lock().unwrap().insert(task_id.into(), times);
            worker
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Worker for ScriptedWorker {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn execute(
            &self,
            task: &TaskRecord,
            context: &CompressedContext,
        ) -> anyhow::Result<String> {
            self.calls.lock().unwrap().push(task.task_id.clone());
            self.contexts.lock().unwrap().push(context.clone());
            let mut failures = self.failures.lock().unwrap();
            if let Some(left) = failures.get_mut(&task.task_id) {
                if *left > 0 {
                    *left -= 1;
                    anyhow::bail!("{} exploded", task.task_id);
                }
            }
            Ok(format!("done {}", task.task_id))
        }
    }

    struct Echo;

    impl Summarizer for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn summarize(&self, content: &str, _kind: SummaryKind) -> String {
            content.to_string()
        }
    }

    struct AsIs;

    impl ComponentPrioritizer for AsIs {
        fn name(&self) -> &str {
            "as-is"
        }

        fn prioritize(&self, components: Vec<ContextComponent>) -> Vec<ContextComponent> {
            components
        }
    }

    struct SlowSearch;

    #[async_trait]
    impl IssueSearch for SlowSearch {
        fn name(&self) -> &str {
            "slow"
        }

        async fn search(&self, error: &str) -> anyhow::Result<Vec<IssueReference>> {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            Ok(vec![IssueReference {
                title: error.to_string(),
                url: "https://issues.invalid/7".into(),
                source: "slow".into(),
                score: None,
            }])
        }
    }

    const TWO_STEP: &str = "Task 1: Scan project layout\nTask 2: Analyze parser code\nDependencies: 1\nTask 3: Suggest improvements";

    fn orchestrator(
        cfg: &AppConfig,
        backend: Arc<dyn DecompositionBackend>,
        worker: Arc<ScriptedWorker>,
    ) -> Orchestrator {
        let services = Services {
            backend,
            worker,
            summarizer: Arc::new(Echo),
            prioritizer: Arc::new(AsIs),
            issue_search: None,
        };
        let knowledge = KnowledgeGraphService::new(cfg.knowledge.clone()).shared();
        Orchestrator::new(cfg, services, knowledge)
    }

    #[tokio::test]
    async fn runs_tasks_in_dependency_order() {
        let worker = Arc::new(ScriptedWorker::default());
        let orch = orchestrator(
            &AppConfig::default(),
            Arc::new(FixedBackend("Task 1: B\nDependencies: 2\nTask 2: A")),
            worker.clone(),
        );

        let report = orch.run(RunRequest::new("do it")).await.unwrap();

        assert_eq!(worker.calls(), vec!["task-2", "task-1"]);
        assert_eq!(report.order, vec!["task-2", "task-1"]);
        assert!(report.succeeded());
        assert_eq!(report.completed(), 2);
    }

    #[tokio::test]
    async fn retries_count_failed_attempts() {
        let worker = Arc::new(ScriptedWorker::failing("task-1", 1));
        let orch = orchestrator(&AppConfig::default(), Arc::new(FixedBackend(TWO_STEP)), worker);

        let report = orch.run(RunRequest::new("go")).await.unwrap();

        let first = &report.outcomes[0];
        assert_eq!(first.task.status, TaskStatus::Completed);
        assert_eq!(first.task.retries, 1);
        assert!(report.succeeded());
    }

    #[tokio::test]
    async fn exhausted_task_halts_run() {
        let mut cfg = AppConfig::default();
        cfg.executor.max_retries = 1;
        let worker = Arc::new(ScriptedWorker::failing("task-1", 10));
        let orch = orchestrator(&cfg, Arc::new(FixedBackend(TWO_STEP)), worker.clone());

        let report = orch.run(RunRequest::new("go")).await.unwrap();

        assert_eq!(worker.calls(), vec!["task-1", "task-1"]);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.outcomes[0].task.retries, 2);
        assert!(report.outcomes[0]
            .error
            .as_deref()
            .unwrap()
            .contains("exploded"));
    }

    #[tokio::test]
    async fn continue_on_failure_skips_only_dependents() {
        let mut cfg = AppConfig::default();
        cfg.executor.max_retries = 0;
        cfg.executor.continue_on_failure = true;
        let worker = Arc::new(ScriptedWorker::failing("task-1", 10));
        let orch = orchestrator(&cfg, Arc::new(FixedBackend(TWO_STEP)), worker.clone());

        let report = orch.run(RunRequest::new("go")).await.unwrap();

        assert_eq!(worker.calls(), vec!["task-1", "task-3"]);
        let by_id: HashMap<_, _> = report
            .outcomes
            .iter()
            .map(|o| (o.task.task_id.as_str(), o))
            .collect();
        assert!(by_id["task-2"].skipped);
        assert_eq!(by_id["task-2"].task.status, TaskStatus::Pending);
        assert_eq!(by_id["task-3"].task.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn cycles_fail_before_any_dispatch() {
        let worker = Arc::new(ScriptedWorker::default());
        let orch = orchestrator(
            &AppConfig::default(),
            Arc::new(FixedBackend("Task 1: A\nDependencies: 2\nTask 2: B\nDependencies: 1")),
            worker.clone(),
        );

        let err = orch.run(RunRequest::new("loop")).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::CircularDependency);
        assert!(worker.calls().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_surfaces() {
        let orch = orchestrator(
            &AppConfig::default(),
            Arc::new(DownBackend),
            Arc::new(ScriptedWorker::default()),
        );
        let err = orch.run(RunRequest::new("x")).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::BackendError);
    }

    #[tokio::test]
    async fn worker_receives_knowledge_context() {
        let worker = Arc::new(ScriptedWorker::default());
        let orch = orchestrator(
            &AppConfig::default(),
            Arc::new(FixedBackend(
                "Task 1: Check dependencies\nDescription: audit serde and tokio versions",
            )),
            worker.clone(),
        );
        let scan = ProjectScan::from_json_str(
            r#"{"dependencies": {"direct": [{"name": "serde", "version": "1.0"}]}}"#,
        )
        .unwrap();
        orch.knowledge().write().await.build_project_graph(&scan);

        let request = RunRequest {
            user_id: Some("dev-1".into()),
            ..RunRequest::new("audit")
        };
        orch.run(request).await.unwrap();

        let contexts = worker.contexts.lock().unwrap();
        let ctx = &contexts[0];
        assert_eq!(ctx.essential.user_id, Some(serde_json::json!("dev-1")));
        assert!(ctx.component("dependencies").is_some());
        assert!(ctx.component("documentation").is_some());
    }

    #[tokio::test]
    async fn issue_search_runs_without_holding_the_graph() {
        let cfg = AppConfig::default();
        let services = Services {
            backend: Arc::new(FixedBackend(TWO_STEP)),
            worker: Arc::new(ScriptedWorker::default()),
            summarizer: Arc::new(Echo),
            prioritizer: Arc::new(AsIs),
            issue_search: Some(Arc::new(SlowSearch)),
        };
        let knowledge = KnowledgeGraphService::new(cfg.knowledge.clone()).shared();
        let orch = Orchestrator::new(&cfg, services, knowledge.clone());

        let (related, writer_acquired) = tokio::join!(
            orch.related_issues("connect ECONNREFUSED 127.0.0.1:5432"),
            async {
                tokio::task::yield_now().await;
                tokio::time::timeout(std::time::Duration::from_millis(200), knowledge.write())
                    .await
                    .is_ok()
            }
        );

        assert!(writer_acquired);
        assert_eq!(related.patterns[0].id, "errorPattern:connection-refused");
        assert_eq!(related.references.len(), 1);
        assert_eq!(related.references[0].source, "slow");
    }
}
