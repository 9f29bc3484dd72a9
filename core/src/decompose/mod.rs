//! Task Decomposer
//!
//! Turns decomposition output into an ordered list of [`TaskRecord`]s.
//!
//! # Architecture
//!
//! ```text
//! raw input (JSON task list | "Task N: ..." block text)
//!   ↓
//! parse_structured() ── not a task list ──▶ parse_task_blocks()
//!   ↓
//! Vec<TaskRecord>  (ids assigned, status/retries reset)
//!   ↓
//! TaskGraph::from_tasks() → into_plan()
//!   ↓
//! ExecutionPlan { order, dangling }
//! ```

mod infer;
mod parser;
mod plan;
mod structured;
mod types;

pub use infer::infer_task_type;
pub use parser::{parse_task_blocks, tokenize_dependencies};
pub use plan::{DanglingDependency, ExecutionPlan, TaskGraph};
pub use structured::parse_structured;
pub use types::{TaskLike, TaskRecord, TaskStatus, TaskType};

use crate::config::DecomposerConfig;
use crate::error::{DecomposeError, PlanError};

#[derive(Debug, Clone, Default)]
pub struct TaskDecomposer {
    strict_dependencies: bool,
}

impl TaskDecomposer {
    pub fn new(cfg: &DecomposerConfig) -> Self {
        Self {
            strict_dependencies: cfg.strict_dependencies,
        }
    }

    /// Parses a structured task list when the input is one, block text
    /// otherwise. An input without recognizable blocks gives an empty list.
    pub fn parse(&self, input: &str) -> Vec<TaskRecord> {
        if let Some(tasks) = parse_structured(input) {
            tracing::debug!(count = tasks.len(), "parsed structured task list");
            return tasks;
        }
        let tasks = parse_task_blocks(input);
        tracing::debug!(count = tasks.len(), "parsed task blocks");
        tasks
    }

    pub fn build_execution_plan(
        &self,
        tasks: Vec<TaskRecord>,
    ) -> Result<ExecutionPlan<TaskRecord>, PlanError> {
        let graph = TaskGraph::from_tasks(&tasks)?;

        let dangling = graph.dangling_dependencies();
        if let Some(first) = dangling.first() {
            if self.strict_dependencies {
                return Err(PlanError::DependencyNotFound {
                    task_id: first.task_id.clone(),
                    missing_dep: first.missing_dep.clone(),
                });
            }
            for d in &dangling {
                tracing::warn!(
                    task_id = %d.task_id,
                    missing = %d.missing_dep,
                    "dependency not in plan; treating as satisfied"
                );
            }
        }

        let plan = graph.into_plan()?;
        tracing::info!(tasks = plan.len(), order = ?plan.task_ids(), "execution plan built");
        Ok(plan)
    }

    /// Parse and order in one step.
    pub fn decompose(&self, input: &str) -> Result<ExecutionPlan<TaskRecord>, DecomposeError> {
        let tasks = self.parse(input);
        if tasks.is_empty() {
            return Err(DecomposeError::NoTasks);
        }
        self.build_execution_plan(tasks).map_err(DecomposeError::Plan)
    }
}
