//! JSON-shaped task input.
//!
//! Accepts a bare array of task objects, an object with a `tasks` array, or
//! either of those wrapped in a fenced ```json block (as model responses
//! tend to be). A fenced block only counts when the text around it has no
//! `Task N:` header; otherwise it is an example quoted inside block text.

use serde::Deserialize;
use serde_json::Value;

use super::infer::infer_task_type;
use super::parser::{has_task_header, tokenize_dependencies};
use super::types::{TaskRecord, TaskType};

/// Every field is loose so that one oddly typed value never costs the task.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateTask {
    #[serde(default, alias = "task_id", alias = "id")]
    task_id: Option<Value>,
    #[serde(default, alias = "task_name", alias = "name", alias = "title")]
    task_name: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default, alias = "task_type", alias = "type", alias = "worker")]
    task_type: Option<Value>,
    #[serde(default)]
    priority: Option<Value>,
    #[serde(default)]
    dependencies: Option<Value>,
}

/// Returns `None` when the input is not a structured task list, so the
/// caller can fall back to block-text parsing.
pub fn parse_structured(input: &str) -> Option<Vec<TaskRecord>> {
    let items = json_body(input).and_then(task_items)?;

    let tasks = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            if !item.is_object() {
                tracing::debug!(index = idx + 1, "skipping non-object task entry");
                return None;
            }
            match serde_json::from_value::<CandidateTask>(item) {
                Ok(candidate) => Some(normalize(candidate, idx + 1)),
                Err(e) => {
                    tracing::debug!(index = idx + 1, error = %e, "skipping malformed task object");
                    None
                }
            }
        })
        .collect();

    Some(tasks)
}

fn json_body(input: &str) -> Option<Value> {
    let trimmed = input.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }
    let (before, body, after) = split_fence(trimmed)?;
    if has_task_header(before) || has_task_header(after) {
        return None;
    }
    serde_json::from_str(body).ok()
}

/// The task entries, if `value` has the shape of a task list.
fn task_items(value: Value) -> Option<Vec<Value>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("tasks") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };
    items.iter().any(Value::is_object).then_some(items)
}

/// Splits at the first fenced block: text before, fence body, text after.
fn split_fence(text: &str) -> Option<(&str, &str, &str)> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let body_start = after_open.find('\n')? + 1;
    let rest = &after_open[body_start..];
    let close = rest.find("```")?;
    Some((&text[..open], rest[..close].trim(), &rest[close + 3..]))
}

/// Assigns ids and defaults; status and retries always restart.
fn normalize(candidate: CandidateTask, position: usize) -> TaskRecord {
    let task_id = candidate
        .task_id
        .as_ref()
        .and_then(value_as_id)
        .unwrap_or_else(|| format!("task-{position}"));
    let name = candidate.task_name.as_ref().map(value_as_text).unwrap_or_default();
    let description = candidate
        .description
        .as_ref()
        .map(value_as_text)
        .unwrap_or_default();
    let task_type = candidate
        .task_type
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<TaskType>().ok())
        .unwrap_or_else(|| infer_task_type(&name, &description));
    let priority = candidate
        .priority
        .as_ref()
        .and_then(value_as_priority)
        .unwrap_or(1);

    let mut dependencies: Vec<String> = Vec::new();
    for id in candidate.dependencies.as_ref().map(dependency_ids).unwrap_or_default() {
        if !dependencies.contains(&id) {
            dependencies.push(id);
        }
    }

    TaskRecord::new(task_id, name, task_type)
        .with_description(description)
        .with_dependencies(dependencies)
        .with_priority(priority)
}

fn value_as_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(format!("task-{n}")),
        _ => None,
    }
}

fn value_as_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A list holds one reference per entry; a single string is tokenized the
/// way a `Dependencies:` line is.
fn dependency_ids(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().filter_map(dependency_id).collect(),
        Value::String(s) => tokenize_dependencies(s),
        Value::Number(_) => dependency_id(v).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn dependency_id(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => n.as_u64().map(|n| format!("task-{n}")),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else if s.chars().all(|c| c.is_ascii_digit()) {
                s.parse::<u64>().ok().map(|n| format!("task-{n}"))
            } else {
                Some(s.to_string())
            }
        }
        _ => None,
    }
}

fn value_as_priority(v: &Value) -> Option<u32> {
    let n = match v {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|p| *p > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::types::TaskStatus;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_and_resets_executor_fields() {
        let input = r#"[
            {"taskName": "Scan repo", "status": "completed", "retries": 7},
            {"id": "lint", "name": "Lint", "type": "static-analysis", "priority": 4, "dependencies": [1]}
        ]"#;
        let tasks = parse_structured(input).unwrap();
        assert_eq!(tasks.len(), 2);

        assert_eq!(tasks[0].task_id, "task-1");
        assert_eq!(tasks[0].task_type, TaskType::ProjectScan);
        assert_eq!(tasks[0].status, TaskStatus::Pending);
        assert_eq!(tasks[0].retries, 0);
        assert_eq!(tasks[0].priority, 1);

        assert_eq!(tasks[1].task_id, "lint");
        assert_eq!(tasks[1].task_type, TaskType::StaticAnalysis);
        assert_eq!(tasks[1].priority, 4);
        assert_eq!(tasks[1].dependencies, vec!["task-1".to_string()]);
    }

    #[test]
    fn accepts_fenced_tasks_object() {
        let input = "Sure!\n```json\n{\"tasks\": [{\"name\": \"Check packages\"}]}\n```\nDone.";
        let tasks = parse_structured(input).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_type, TaskType::DependencyCheck);
    }

    #[test]
    fn prose_is_not_structured() {
        assert!(parse_structured("Task 1: A").is_none());
        assert!(parse_structured("42").is_none());
    }

    #[test]
    fn json_that_is_not_a_task_list_is_not_structured() {
        assert!(parse_structured(r#"{"plan": []}"#).is_none());
        assert!(parse_structured(r#"{"port": 8080}"#).is_none());
        assert!(parse_structured("[1, 2, 3]").is_none());
        assert!(parse_structured(r#"{"tasks": ["a", "b"]}"#).is_none());
    }

    #[test]
    fn fence_inside_block_text_is_an_example() {
        let input = "Task 1: Write loader\n```json\n[{\"name\": \"x\"}]\n```";
        assert!(parse_structured(input).is_none());
    }

    #[test]
    fn loose_field_types_keep_the_task() {
        let input = r#"[
            {"name": "Build"},
            {"name": "Deploy", "dependencies": "1"},
            {"name": 42, "description": null, "dependencies": "task-1, task-2 and setup-db"},
            {"name": "Notify", "dependencies": 2, "type": 7}
        ]"#;
        let tasks = parse_structured(input).unwrap();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[1].dependencies, vec!["task-1".to_string()]);
        assert_eq!(tasks[2].task_name, "42");
        assert_eq!(tasks[2].description, "");
        assert_eq!(
            tasks[2].dependencies,
            vec!["task-1".to_string(), "task-2".to_string(), "setup-db".to_string()]
        );
        assert_eq!(tasks[3].dependencies, vec!["task-2".to_string()]);
        assert_eq!(tasks[3].task_type, TaskType::LocalData);
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let tasks = parse_structured(r#"[42, {"name": "Keep me"}]"#).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_id, "task-2");
    }
}
