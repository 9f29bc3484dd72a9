use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Worker category a task is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    ProjectScan,
    StaticAnalysis,
    DependencyCheck,
    InnovationSuggestion,
    Knowledge,
    LocalData,
}

impl TaskType {
    pub const ALL: [TaskType; 6] = [
        TaskType::ProjectScan,
        TaskType::StaticAnalysis,
        TaskType::DependencyCheck,
        TaskType::InnovationSuggestion,
        TaskType::Knowledge,
        TaskType::LocalData,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectScan => "project-scan",
            Self::StaticAnalysis => "static-analysis",
            Self::DependencyCheck => "dependency-check",
            Self::InnovationSuggestion => "innovation-suggestion",
            Self::Knowledge => "knowledge",
            Self::LocalData => "local-data",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown task type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

/// One unit of decomposed work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub task_id: String,
    pub task_name: String,
    pub description: String,
    pub task_type: TaskType,
    pub priority: u32,
    pub dependencies: Vec<String>,
    pub status: TaskStatus,
    pub retries: u32,
}

impl TaskRecord {
    pub fn new(task_id: impl Into<String>, task_name: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            task_id: task_id.into(),
            task_name: task_name.into(),
            description: String::new(),
            task_type,
            priority: 1,
            dependencies: Vec::new(),
            status: TaskStatus::Pending,
            retries: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority.max(1);
        self
    }

    /// Text fed to the relevance query for this task.
    pub fn query_text(&self) -> String {
        if self.description.is_empty() {
            self.task_name.clone()
        } else {
            format!("{} {}", self.task_name, self.description)
        }
    }
}

/// Common task interface for dependency graph handling.
pub trait TaskLike: Clone {
    fn id(&self) -> &str;
    fn dependencies(&self) -> &[String];
}

impl TaskLike for TaskRecord {
    fn id(&self) -> &str {
        &self.task_id
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_type_parses_loosely() {
        assert_eq!("Static_Analysis".parse::<TaskType>().unwrap(), TaskType::StaticAnalysis);
        assert_eq!("local-data".parse::<TaskType>().unwrap(), TaskType::LocalData);
        assert!("compiler".parse::<TaskType>().is_err());
    }

    #[test]
    fn record_serializes_camel_case() {
        let task = TaskRecord::new("task-1", "Scan", TaskType::ProjectScan);
        let v = serde_json::to_value(&task).unwrap();
        assert_eq!(v["taskId"], "task-1");
        assert_eq!(v["taskType"], "project-scan");
        assert_eq!(v["status"], "pending");
        assert_eq!(v["retries"], 0);
    }
}
