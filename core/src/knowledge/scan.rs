//! Project-scan bundle consumed by graph ingestion.
//!
//! Produced by an external scanner; this crate only decodes it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::KnowledgeError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectScan {
    #[serde(default)]
    pub files: Vec<ScannedFile>,
    #[serde(default)]
    pub dependencies: DependencyTree,
    #[serde(default)]
    pub code_entities: Vec<ScannedEntity>,
    #[serde(default)]
    pub imports: Vec<ImportRecord>,
    #[serde(default)]
    pub function_calls: Vec<CallRecord>,
}

impl ProjectScan {
    pub fn from_json_str(input: &str) -> Result<Self, KnowledgeError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, KnowledgeError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedFile {
    pub path: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyTree {
    #[serde(default)]
    pub direct: Vec<DependencySpec>,
    #[serde(default)]
    pub transitive: Vec<DependencySpec>,
}

/// One dependency, optionally with its own nested requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySpec {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedEntity {
    #[serde(alias = "type")]
    pub entity_type: String,
    pub name: String,
    pub file: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
}

/// `from` imports `to`; both are file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub caller: String,
    pub callee: String,
    #[serde(default)]
    pub caller_file: Option<String>,
    #[serde(default)]
    pub callee_file: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}
