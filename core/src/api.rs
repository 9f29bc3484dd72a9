//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `taskloom_core::api` instead of reaching into internal modules.

pub use crate::compress::{
    CharRatioEstimator, ComponentPayload, ComponentPrioritizer, CompressedContext,
    ContextComponent, ContextCompressor, DependencyItem, EssentialMetadata, Summarizer,
    SummaryKind, TokenEstimator,
};
pub use crate::config::{
    get_taskloom_data_dir, load_default, load_from_path, resolve_log_dir, AppConfig,
    CompressorConfig, DecomposerConfig, ExecutorConfig, KnowledgeConfig, LoggingConfig,
};
pub use crate::decompose::{
    DanglingDependency, ExecutionPlan, TaskDecomposer, TaskRecord, TaskStatus, TaskType,
};
pub use crate::error::{
    DecomposeError, ErrorCode, KnowledgeError, OrchestratorError, PlanError,
};
pub use crate::knowledge::{
    search_issue_references, ContextBundle, IssueReference, IssueSearch, KnowledgeGraphService,
    PatternMatch, ProjectScan, RelatedIssues, RelevanceQuery, SharedKnowledgeGraph,
};
pub use crate::orchestrator::{
    DecompositionBackend, Orchestrator, RunReport, RunRequest, Services, ServicesFactory,
    TaskOutcome, Worker,
};
