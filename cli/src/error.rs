use taskloom_core::api::{ErrorCode, KnowledgeError, OrchestratorError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Orchestrator(#[from] OrchestratorError),
    #[error("project scan: {0}")]
    Knowledge(#[from] KnowledgeError),
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    Input(String),
    #[error("{failed} task(s) failed, {skipped} skipped")]
    TasksFailed { failed: usize, skipped: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Orchestrator(e) => e.error_code(),
            Self::Knowledge(_) => ErrorCode::ScanError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Input(_) => ErrorCode::ValidationError,
            Self::Json(_) => ErrorCode::ParseError,
            Self::TasksFailed { .. } => ErrorCode::WorkerError,
            Self::Io(_) | Self::Anyhow(_) => ErrorCode::GeneralError,
        }
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.error_code().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use taskloom_core::api::{DecomposeError, PlanError};

    use super::*;

    #[test]
    fn plan_errors_keep_their_codes() {
        let err = CliError::from(OrchestratorError::Decompose(DecomposeError::Plan(
            PlanError::CircularDependency {
                task_id: "task-1".into(),
                path: "task-1 -> task-2 -> task-1".into(),
            },
        )));
        assert_eq!(err.exit_code(), 12);
        assert_eq!(CliError::Config("bad".into()).exit_code(), 30);
        assert_eq!(
            CliError::TasksFailed {
                failed: 1,
                skipped: 0
            }
            .exit_code(),
            21
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = CliError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert_eq!(err.error_code(), ErrorCode::ParseError);
        assert_eq!(err.exit_code(), 2);
    }
}
