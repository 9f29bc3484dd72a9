use thiserror::Error;

use super::code::ErrorCode;

/// Errors raised while turning a task set into an execution order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Duplicate task ID: {0}")]
    DuplicateTaskId(String),

    #[error("Dependency not found: task '{task_id}' depends on '{missing_dep}'")]
    DependencyNotFound { task_id: String, missing_dep: String },

    #[error("Circular dependency detected at '{task_id}': {path}")]
    CircularDependency { task_id: String, path: String },
}

impl PlanError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::DuplicateTaskId(_) => ErrorCode::ValidationError,
            Self::DependencyNotFound { .. } => ErrorCode::DependencyError,
            Self::CircularDependency { .. } => ErrorCode::CircularDependency,
        }
    }
}
