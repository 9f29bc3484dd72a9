//! Per-task context object handed to the compressor.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::decompose::TaskRecord;
use crate::knowledge::{AbilityProfile, ContextBundle, ContextEntity};

use super::types::RunRequest;

fn entity_str<'a>(entity: &'a ContextEntity, field: &str) -> Option<&'a str> {
    entity.data.get(field).and_then(Value::as_str)
}

fn code_line(entity: &ContextEntity) -> Option<String> {
    let name = entity_str(entity, "name")?;
    let kind = entity_str(entity, "entityType").unwrap_or("entity");
    let file = entity_str(entity, "file").unwrap_or("?");
    let line = entity.data.get("line").and_then(Value::as_u64).unwrap_or(0);
    Some(format!("{kind} {name} @ {file}:{line}"))
}

/// Lays a knowledge bundle out as compressor components:
/// `code` (entity index), `dependencies` (scored), `documentation` (task
/// text) and `knowledge` (everything else).
pub fn build_task_context(
    task: &TaskRecord,
    request: &RunRequest,
    bundle: &ContextBundle,
    profile: Option<&AbilityProfile>,
    now: DateTime<Utc>,
) -> Value {
    let mut ctx = Map::new();
    if let Some(user_id) = &request.user_id {
        ctx.insert("userId".into(), json!(user_id));
    }
    if let Some(project_type) = &request.project_type {
        ctx.insert("projectType".into(), json!(project_type));
    }
    ctx.insert("requestType".into(), json!(task.task_type));
    ctx.insert("timestamp".into(), json!(now.to_rfc3339()));

    let mut code = Vec::new();
    let mut dependencies = Vec::new();
    let mut other = Vec::new();
    for entity in &bundle.entities {
        match entity.kind.as_str() {
            "codeEntity" => code.extend(code_line(entity)),
            "dependency" => dependencies.push(json!({
                "name": entity_str(entity, "name").unwrap_or(entity.id.as_str()),
                "version": entity_str(entity, "version"),
                "importance": entity.score,
            })),
            _ => other.push(entity),
        }
    }

    if !code.is_empty() {
        ctx.insert("code".into(), json!({ "content": code.join("\n") }));
    }
    if !dependencies.is_empty() {
        ctx.insert("dependencies".into(), Value::Array(dependencies));
    }
    if !task.description.is_empty() {
        ctx.insert(
            "documentation".into(),
            json!({ "content": task.description, "title": task.task_name }),
        );
    }
    if !other.is_empty() || !bundle.relationships.is_empty() {
        ctx.insert(
            "knowledge".into(),
            json!({
                "entities": other,
                "relationships": bundle.relationships,
                "summary": bundle.summary,
            }),
        );
    }
    if let Some(profile) = profile {
        ctx.insert("userProfile".into(), json!(profile));
    }
    Value::Object(ctx)
}
