#[allow(clippy::module_inception)]
pub mod error;
pub mod code;
pub mod plan;

pub use code::ErrorCode;
pub use error::{DecomposeError, KnowledgeError, OrchestratorError};
pub use plan::PlanError;
