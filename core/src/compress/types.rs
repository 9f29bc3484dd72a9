use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Context keys that are carried verbatim and never compressed.
pub const ESSENTIAL_KEYS: [&str; 4] = ["userId", "projectType", "requestType", "timestamp"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssentialMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

impl EssentialMetadata {
    pub fn from_context(context: &Map<String, Value>) -> Self {
        let field = |key: &str| context.get(key).filter(|v| !v.is_null()).cloned();
        Self {
            user_id: field("userId"),
            project_type: field("projectType"),
            request_type: field("requestType"),
            timestamp: field("timestamp"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.project_type.is_none()
            && self.request_type.is_none()
            && self.timestamp.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub importance: f64,
}

impl DependencyItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            importance: 0.0,
        }
    }
}

/// Component body; the `type` tag doubles as the compression strategy key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ComponentPayload {
    Code {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    Dependencies {
        items: Vec<DependencyItem>,
        #[serde(
            default,
            rename = "totalCount",
            skip_serializing_if = "Option::is_none"
        )]
        total_count: Option<usize>,
    },
    Documentation {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Other {
        kind: String,
        payload: Value,
    },
}

impl ComponentPayload {
    /// Interprets one context entry. Shapes that do not match the key's
    /// expected layout fall back to `Other`.
    pub fn from_entry(key: &str, value: &Value) -> Self {
        let parsed = match key {
            "code" => text_body(value, "path")
                .map(|(content, path)| Self::Code { content, path }),
            "documentation" => text_body(value, "title")
                .map(|(content, title)| Self::Documentation { content, title }),
            "dependencies" => dependency_items(value).map(|items| Self::Dependencies {
                items,
                total_count: None,
            }),
            _ => None,
        };
        parsed.unwrap_or_else(|| Self::Other {
            kind: key.to_string(),
            payload: value.clone(),
        })
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::Code { .. } => "code",
            Self::Dependencies { .. } => "dependencies",
            Self::Documentation { .. } => "documentation",
            Self::Other { kind, .. } => kind,
        }
    }
}

fn text_body(value: &Value, label_key: &str) -> Option<(String, Option<String>)> {
    match value {
        Value::String(s) => Some((s.clone(), None)),
        Value::Object(obj) => {
            let content = obj.get("content")?.as_str()?.to_string();
            let label = obj
                .get(label_key)
                .and_then(Value::as_str)
                .map(str::to_string);
            Some((content, label))
        }
        _ => None,
    }
}

fn dependency_items(value: &Value) -> Option<Vec<DependencyItem>> {
    match value {
        Value::Array(entries) => entries
            .iter()
            .map(|entry| match entry {
                Value::String(name) => Some(DependencyItem::named(name.clone())),
                other => serde_json::from_value(other.clone()).ok(),
            })
            .collect(),
        Value::Object(map) => Some(
            map.iter()
                .map(|(name, version)| DependencyItem {
                    name: name.clone(),
                    version: version.as_str().map(str::to_string),
                    importance: 0.0,
                })
                .collect(),
        ),
        _ => None,
    }
}

/// A keyed, independently packable unit of context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextComponent {
    pub key: String,
    #[serde(flatten)]
    pub payload: ComponentPayload,
    pub estimated_tokens: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_compressed: bool,
}

impl ContextComponent {
    pub fn kind(&self) -> &str {
        self.payload.kind()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedContext {
    #[serde(flatten)]
    pub essential: EssentialMetadata,
    pub components: Vec<ContextComponent>,
    pub essential_tokens: usize,
    pub total_tokens: usize,
    /// Keys of components that were neither packed nor compressible.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub budget_exceeded: bool,
}

impl CompressedContext {
    pub fn component_tokens(&self) -> usize {
        self.components.iter().map(|c| c.estimated_tokens).sum()
    }

    pub fn component(&self, key: &str) -> Option<&ContextComponent> {
        self.components.iter().find(|c| c.key == key)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn entries_map_to_payloads() {
        assert_eq!(
            ComponentPayload::from_entry("code", &json!({"content": "fn a() {}", "path": "a.rs"})),
            ComponentPayload::Code {
                content: "fn a() {}".into(),
                path: Some("a.rs".into())
            }
        );
        let deps = ComponentPayload::from_entry(
            "dependencies",
            &json!(["tokio", {"name": "serde", "version": "1", "importance": 0.9}]),
        );
        let ComponentPayload::Dependencies { items, .. } = deps else {
            panic!("expected dependencies");
        };
        assert_eq!(items[0], DependencyItem::named("tokio"));
        assert_eq!(items[1].importance, 0.9);
    }

    #[test]
    fn mismatched_shapes_fall_back_to_other() {
        let payload = ComponentPayload::from_entry("code", &json!(42));
        assert_eq!(payload.kind(), "code");
        assert!(matches!(payload, ComponentPayload::Other { .. }));
        assert_eq!(
            ComponentPayload::from_entry("notes", &json!("x")).kind(),
            "notes"
        );
    }

    #[test]
    fn essential_metadata_skips_nulls() {
        let ctx = json!({"userId": "u1", "projectType": null, "code": "x"});
        let meta = EssentialMetadata::from_context(ctx.as_object().unwrap());
        assert_eq!(meta.user_id, Some(json!("u1")));
        assert!(meta.project_type.is_none());
        assert!(!meta.is_empty());
    }

    #[test]
    fn component_serializes_with_type_tag() {
        let component = ContextComponent {
            key: "docs".into(),
            payload: ComponentPayload::Documentation {
                content: "Usage".into(),
                title: None,
            },
            estimated_tokens: 3,
            is_compressed: true,
        };
        let value = serde_json::to_value(&component).unwrap();
        assert_eq!(value["type"], "documentation");
        assert_eq!(value["isCompressed"], true);
        assert_eq!(value["estimatedTokens"], 3);
    }
}
