use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::{EdgePayload, GraphStore, NodePayload};

pub type KnowledgeGraph = GraphStore<KnowledgeNode, KnowledgeEdge>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub is_direct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEntityNode {
    pub entity_type: String,
    pub name: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkNode {
    pub name: String,
    pub language: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPatternNode {
    pub pattern: String,
    pub description: String,
    pub solutions: Vec<String>,
}

/// Typed attribute record per node kind.
#[derive(Debug, Clone, PartialEq)]
pub enum KnowledgeNode {
    File(FileNode),
    Dependency(DependencyNode),
    CodeEntity(CodeEntityNode),
    Framework(FrameworkNode),
    ErrorPattern(ErrorPatternNode),
    /// Caller-defined tag with a free-form attribute bag.
    Custom {
        tag: String,
        attributes: Map<String, Value>,
    },
}

impl KnowledgeNode {
    pub fn file_id(path: &str) -> String {
        format!("file:{path}")
    }

    pub fn dependency_id(name: &str) -> String {
        format!("dependency:{name}")
    }

    pub fn code_entity_id(entity_type: &str, name: &str, file: &str, line: Option<u32>) -> String {
        format!("codeEntity:{entity_type}:{name}:{file}:{}", line.unwrap_or(0))
    }

    pub fn framework_id(name: &str) -> String {
        format!("framework:{name}")
    }

    pub fn error_pattern_id(slug: &str) -> String {
        format!("errorPattern:{slug}")
    }

    /// The attribute record alone, without the kind envelope.
    pub fn attributes(&self) -> Value {
        let value = match self {
            Self::File(n) => serde_json::to_value(n),
            Self::Dependency(n) => serde_json::to_value(n),
            Self::CodeEntity(n) => serde_json::to_value(n),
            Self::Framework(n) => serde_json::to_value(n),
            Self::ErrorPattern(n) => serde_json::to_value(n),
            Self::Custom { attributes, .. } => return Value::Object(attributes.clone()),
        };
        value.unwrap_or(Value::Null)
    }

    /// Lowercased serialized attributes, used for lexical matching.
    pub fn search_text(&self) -> String {
        self.attributes().to_string().to_lowercase()
    }
}

impl NodePayload for KnowledgeNode {
    fn kind(&self) -> &str {
        match self {
            Self::File(_) => "file",
            Self::Dependency(_) => "dependency",
            Self::CodeEntity(_) => "codeEntity",
            Self::Framework(_) => "framework",
            Self::ErrorPattern(_) => "errorPattern",
            Self::Custom { tag, .. } => tag,
        }
    }

    fn merge(&mut self, incoming: Self) {
        match (self, incoming) {
            (Self::Dependency(existing), Self::Dependency(new)) => {
                existing.is_direct |= new.is_direct;
                if new.version.is_some() {
                    existing.version = new.version;
                }
            }
            (Self::File(existing), Self::File(new)) => {
                existing.language = new.language.or(existing.language.take());
                existing.size = new.size.or(existing.size);
            }
            (
                Self::Custom { attributes, .. },
                Self::Custom {
                    attributes: incoming,
                    ..
                },
            ) => attributes.extend(incoming),
            (existing, new) => *existing = new,
        }
    }
}

/// Relationship label plus optional edge data.
#[derive(Debug, Clone, PartialEq)]
pub enum KnowledgeEdge {
    Contains,
    Imports,
    Calls { count: u32 },
    Requires,
    Ecosystem,
    OccursIn,
    Custom { label: String, data: Option<Value> },
}

impl KnowledgeEdge {
    pub fn data(&self) -> Option<Value> {
        match self {
            Self::Calls { count } => Some(serde_json::json!({ "count": count })),
            Self::Custom { data, .. } => data.clone(),
            _ => None,
        }
    }
}

impl EdgePayload for KnowledgeEdge {
    fn kind(&self) -> &str {
        match self {
            Self::Contains => "contains",
            Self::Imports => "imports",
            Self::Calls { .. } => "calls",
            Self::Requires => "requires",
            Self::Ecosystem => "ecosystem",
            Self::OccursIn => "occursIn",
            Self::Custom { label, .. } => label,
        }
    }
}
