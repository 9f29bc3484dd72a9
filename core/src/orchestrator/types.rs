use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::decompose::{DanglingDependency, TaskRecord, TaskStatus};

#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub prompt: String,
    pub user_id: Option<String>,
    pub project_type: Option<String>,
    /// Overrides the configured compression budget.
    pub max_tokens: Option<usize>,
}

impl RunRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOutcome {
    pub task: TaskRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub skipped: bool,
    pub context_tokens: usize,
    pub duration_ms: u64,
}

impl TaskOutcome {
    pub(crate) fn skipped(task: TaskRecord, reason: String) -> Self {
        Self {
            task,
            output: None,
            error: Some(reason),
            skipped: true,
            context_tokens: 0,
            duration_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub order: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dangling: Vec<DanglingDependency>,
    pub outcomes: Vec<TaskOutcome>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.count(TaskStatus::Completed)
    }

    pub fn failed(&self) -> usize {
        self.count(TaskStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.skipped).count()
    }

    pub fn succeeded(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.task.status == TaskStatus::Completed)
    }

    fn count(&self, status: TaskStatus) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.task.status == status)
            .count()
    }
}
