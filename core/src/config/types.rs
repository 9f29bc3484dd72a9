use serde::{Deserialize, Serialize};

use crate::decompose::TaskType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub decomposer: DecomposerConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub compressor: CompressorConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (`~/.taskloom/logs` if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "taskloom_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecomposerConfig {
    /// Reject plans whose tasks reference ids that are not part of the plan.
    #[serde(default)]
    pub strict_dependencies: bool,
}

/// A (task type, node kind) pair that earns the relevance bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusPair {
    pub task_type: TaskType,
    pub node_kind: String,
}

impl BonusPair {
    pub fn new(task_type: TaskType, node_kind: impl Into<String>) -> Self {
        Self {
            task_type,
            node_kind: node_kind.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    #[serde(default = "default_type_bonus")]
    pub type_bonus: f64,

    #[serde(default = "default_bonus_pairs")]
    pub bonus_pairs: Vec<BonusPair>,

    #[serde(default = "default_profile_cache_capacity")]
    pub profile_cache_capacity: usize,
}

fn default_max_nodes() -> usize {
    20
}

fn default_type_bonus() -> f64 {
    0.5
}

fn default_bonus_pairs() -> Vec<BonusPair> {
    vec![
        BonusPair::new(TaskType::DependencyCheck, "dependency"),
        BonusPair::new(TaskType::StaticAnalysis, "codeEntity"),
    ]
}

fn default_profile_cache_capacity() -> usize {
    256
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            type_bonus: default_type_bonus(),
            bonus_pairs: default_bonus_pairs(),
            profile_cache_capacity: default_profile_cache_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressorConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Estimated token cost of one kept dependency entry.
    #[serde(default = "default_dependency_item_cost")]
    pub dependency_item_cost: usize,

    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: usize,
}

fn default_max_tokens() -> usize {
    2000
}

fn default_dependency_item_cost() -> usize {
    50
}

fn default_chars_per_token() -> usize {
    4
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            dependency_item_cost: default_dependency_item_cost(),
            chars_per_token: default_chars_per_token(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Keep dispatching independent tasks after one fails.
    #[serde(default)]
    pub continue_on_failure: bool,
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            continue_on_failure: false,
        }
    }
}
