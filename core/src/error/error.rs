use thiserror::Error;

use super::code::ErrorCode;
use super::plan::PlanError;

#[derive(Error, Debug)]
pub enum DecomposeError {
    #[error("no task blocks found in decomposition input")]
    NoTasks,
    #[error(transparent)]
    Plan(#[from] PlanError),
}

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("project scan could not be decoded: {0}")]
    InvalidScan(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("decomposition backend failed: {0}")]
    Backend(#[source] anyhow::Error),
    #[error("decomposition failed: {0}")]
    Decompose(#[from] DecomposeError),
}

impl OrchestratorError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Backend(_) => ErrorCode::BackendError,
            Self::Decompose(DecomposeError::NoTasks) => ErrorCode::TaskNotFound,
            Self::Decompose(DecomposeError::Plan(e)) => e.error_code(),
        }
    }
}
