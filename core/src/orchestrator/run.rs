use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::compress::{CompressedContext, ContextCompressor};
use crate::config::{AppConfig, ExecutorConfig};
use crate::decompose::{ExecutionPlan, TaskDecomposer, TaskRecord, TaskStatus};
use crate::error::OrchestratorError;
use crate::knowledge::{
    search_issue_references, RelatedIssues, RelevanceQuery, SharedKnowledgeGraph,
};

use super::context::build_task_context;
use super::traits::Services;
use super::types::{RunReport, RunRequest, TaskOutcome};

pub struct Orchestrator {
    decomposer: TaskDecomposer,
    compressor: ContextCompressor,
    knowledge: SharedKnowledgeGraph,
    services: Services,
    executor: ExecutorConfig,
}

impl Orchestrator {
    pub fn new(cfg: &AppConfig, services: Services, knowledge: SharedKnowledgeGraph) -> Self {
        let compressor = ContextCompressor::new(
            cfg.compressor.clone(),
            services.summarizer.clone(),
            services.prioritizer.clone(),
        );
        Self {
            decomposer: TaskDecomposer::new(&cfg.decomposer),
            compressor,
            knowledge,
            services,
            executor: cfg.executor.clone(),
        }
    }

    pub fn knowledge(&self) -> &SharedKnowledgeGraph {
        &self.knowledge
    }

    pub fn compressor(&self) -> &ContextCompressor {
        &self.compressor
    }

    /// Asks the backend for a breakdown and orders it.
    pub async fn plan(&self, prompt: &str) -> Result<ExecutionPlan<TaskRecord>, OrchestratorError> {
        let raw = self
            .services
            .backend
            .decompose(prompt)
            .await
            .map_err(OrchestratorError::Backend)?;
        tracing::debug!(backend = self.services.backend.name(), bytes = raw.len(), "decomposition received");
        Ok(self.decomposer.decompose(&raw)?)
    }

    /// Relevance query, context assembly and compression for one task.
    pub async fn prepare_context(&self, task: &TaskRecord, request: &RunRequest) -> CompressedContext {
        let profile = match &request.user_id {
            Some(user_id) => Some(self.knowledge.write().await.ability_profile(user_id)),
            None => None,
        };
        let bundle = self
            .knowledge
            .read()
            .await
            .get_relevant_context(&RelevanceQuery::from(task), None);
        let context = build_task_context(task, request, &bundle, profile.as_ref(), Utc::now());
        self.compressor.compress(&context, request.max_tokens)
    }

    /// Baseline pattern matches plus external references. The graph lock
    /// is released before the external search runs.
    pub async fn related_issues(&self, error: &str) -> RelatedIssues {
        let patterns = self.knowledge.read().await.match_error_patterns(error);
        let references =
            search_issue_references(self.services.issue_search.as_deref(), error).await;
        RelatedIssues {
            patterns,
            references,
        }
    }

    pub async fn run(&self, request: RunRequest) -> Result<RunReport, OrchestratorError> {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        tracing::info!(run_id = %run_id, worker = self.services.worker.name(), "run started");

        let ExecutionPlan { order, dangling } = self.plan(&request.prompt).await?;
        let task_ids: Vec<String> = order.iter().map(|t| t.task_id.clone()).collect();

        let mut outcomes = Vec::with_capacity(order.len());
        let mut unfinished: HashSet<String> = HashSet::new();
        let mut halted_by: Option<String> = None;

        for task in order {
            if let Some(stopper) = &halted_by {
                let reason = format!("run halted after '{stopper}' failed");
                unfinished.insert(task.task_id.clone());
                outcomes.push(TaskOutcome::skipped(task, reason));
                continue;
            }
            let blocked_on = task
                .dependencies
                .iter()
                .find(|d| unfinished.contains(*d))
                .cloned();
            if let Some(dep) = blocked_on {
                let reason = format!("dependency '{dep}' did not complete");
                tracing::warn!(task_id = %task.task_id, %reason, "skipping task");
                unfinished.insert(task.task_id.clone());
                outcomes.push(TaskOutcome::skipped(task, reason));
                continue;
            }

            let outcome = self.execute_task(task, &request).await;
            if outcome.task.status == TaskStatus::Failed {
                unfinished.insert(outcome.task.task_id.clone());
                if !self.executor.continue_on_failure {
                    halted_by = Some(outcome.task.task_id.clone());
                }
            }
            outcomes.push(outcome);
        }

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            order: task_ids,
            dangling,
            outcomes,
        };
        tracing::info!(
            run_id = %report.run_id,
            completed = report.completed(),
            failed = report.failed(),
            skipped = report.skipped(),
            "run finished"
        );
        Ok(report)
    }

    async fn execute_task(&self, mut task: TaskRecord, request: &RunRequest) -> TaskOutcome {
        let context = self.prepare_context(&task, request).await;
        let started = Instant::now();
        let max_attempts = self.executor.max_retries.saturating_add(1);
        task.status = TaskStatus::Running;
        tracing::info!(
            task_id = %task.task_id,
            task_type = %task.task_type,
            context_tokens = context.total_tokens,
            "task started"
        );

        let mut last_error = None;
        for attempt in 1..=max_attempts {
            match self.services.worker.execute(&task, &context).await {
                Ok(output) => {
                    task.status = TaskStatus::Completed;
                    tracing::info!(task_id = %task.task_id, attempt, "task completed");
                    return TaskOutcome {
                        task,
                        output: Some(output),
                        error: None,
                        skipped: false,
                        context_tokens: context.total_tokens,
                        duration_ms: started.elapsed().as_millis() as u64,
                    };
                }
                Err(err) => {
                    task.retries += 1;
                    tracing::warn!(
                        task_id = %task.task_id,
                        attempt,
                        max_attempts,
                        error = %err,
                        "worker attempt failed"
                    );
                    last_error = Some(format!("{err:#}"));
                }
            }
        }

        task.status = TaskStatus::Failed;
        TaskOutcome {
            task,
            output: None,
            error: last_error,
            skipped: false,
            context_tokens: context.total_tokens,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}
