//! Block-text task parser.
//!
//! Decomposition text is read line by line through a small state machine.
//! A header line `Task N: Name` opens a block; the optional field labels
//! `Description:`, `Dependencies:`, `Priority:` and `Worker:` are accepted
//! only in that relative order. Everything the machine does not recognize
//! is dropped:
//!
//! ```text
//!            header
//!   Idle ─────────────▶ Header ──▶ Description ──▶ Dependencies ──▶ Priority ──▶ Worker
//!    ▲                    │  (each transition optional, never backwards)
//!    └── header w/o name ─┘
//! ```
//!
//! Unlabeled lines extend the description while the machine sits in the
//! `Description` state and are ignored anywhere else.

use regex::Regex;
use std::sync::OnceLock;

use super::infer::infer_task_type;
use super::types::{TaskRecord, TaskType};

/// Field position inside a block; the derive order is the accepted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Header,
    Description,
    Dependencies,
    Priority,
    Worker,
}

#[derive(Debug)]
struct BlockDraft {
    index: u32,
    name: String,
    description: Vec<String>,
    dependencies: Vec<String>,
    priority: Option<u32>,
    worker: Option<String>,
    state: Field,
}

impl BlockDraft {
    fn open(index: u32, name: String) -> Self {
        Self {
            index,
            name,
            description: Vec::new(),
            dependencies: Vec::new(),
            priority: None,
            worker: None,
            state: Field::Header,
        }
    }

    fn accept_field(&mut self, field: Field, value: &str) -> bool {
        if field <= self.state {
            return false;
        }
        match field {
            Field::Header => return false,
            Field::Description => {
                if !value.is_empty() {
                    self.description.push(value.to_string());
                }
            }
            Field::Dependencies => self.dependencies = tokenize_dependencies(value),
            Field::Priority => self.priority = parse_priority(value),
            Field::Worker => {
                if !value.is_empty() {
                    self.worker = Some(value.to_string());
                }
            }
        }
        self.state = field;
        true
    }

    fn accept_text(&mut self, line: &str) {
        if self.state == Field::Description && !line.is_empty() {
            self.description.push(line.to_string());
        }
    }

    fn finish(self) -> TaskRecord {
        let description = self.description.join(" ");
        let task_type = self
            .worker
            .as_deref()
            .and_then(parse_worker)
            .unwrap_or_else(|| infer_task_type(&self.name, &description));

        TaskRecord::new(format!("task-{}", self.index), self.name, task_type)
            .with_description(description)
            .with_dependencies(self.dependencies)
            .with_priority(self.priority.unwrap_or(1))
    }
}

enum Line<'a> {
    Header { index: u32, name: &'a str },
    Field { field: Field, value: &'a str },
    Text(&'a str),
}

/// Parses numbered task blocks out of free text. Never fails: input that
/// does not form a block yields no task.
pub fn parse_task_blocks(input: &str) -> Vec<TaskRecord> {
    let mut tasks = Vec::new();
    let mut current: Option<BlockDraft> = None;

    for raw in input.lines() {
        let line = clean_line(raw);
        match classify(&line) {
            Line::Header { index, name } => {
                if let Some(block) = current.take() {
                    tasks.push(block.finish());
                }
                if name.is_empty() {
                    tracing::debug!(index, "dropping task header without a name");
                } else {
                    current = Some(BlockDraft::open(index, name.to_string()));
                }
            }
            Line::Field { field, value } => match current.as_mut() {
                Some(block) => {
                    if !block.accept_field(field, value) {
                        tracing::debug!(
                            task = block.index,
                            ?field,
                            "dropping out-of-order field line"
                        );
                    }
                }
                None => tracing::debug!(?field, "dropping field line outside a task block"),
            },
            Line::Text(text) => {
                if let Some(block) = current.as_mut() {
                    block.accept_text(text);
                }
            }
        }
    }

    if let Some(block) = current.take() {
        tasks.push(block.finish());
    }
    tasks
}

/// True when some line of `text` opens a `Task N:` block.
pub(crate) fn has_task_header(text: &str) -> bool {
    text.lines()
        .any(|raw| matches!(classify(&clean_line(raw)), Line::Header { .. }))
}

/// Strips list bullets, markdown headings and bold markers.
fn clean_line(raw: &str) -> String {
    let without_bold = raw.replace("**", "").replace("__", "");
    let trimmed = without_bold.trim();
    let trimmed = trimmed.trim_start_matches('#').trim_start();
    let trimmed = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .unwrap_or(trimmed);
    trimmed.trim().to_string()
}

fn classify(line: &str) -> Line<'_> {
    static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
    let header = HEADER_REGEX
        .get_or_init(|| Regex::new(r"(?i)^task\s*#?\s*(\d+)\s*[:.)\-]\s*(.*)$").unwrap());

    if let Some(caps) = header.captures(line) {
        if let Ok(index) = caps[1].parse::<u32>() {
            let name = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            return Line::Header { index, name };
        }
    }

    if let Some((label, value)) = line.split_once(':') {
        if let Some(field) = field_for_label(label) {
            return Line::Field {
                field,
                value: value.trim(),
            };
        }
    }

    Line::Text(line)
}

fn field_for_label(label: &str) -> Option<Field> {
    match label.trim().to_lowercase().as_str() {
        "description" => Some(Field::Description),
        "dependencies" | "dependency" | "depends on" => Some(Field::Dependencies),
        "priority" => Some(Field::Priority),
        "worker" => Some(Field::Worker),
        _ => None,
    }
}

/// Filler that reads naturally in a `Dependencies:` line ("task 1 and 2").
const IGNORED_DEPENDENCY_WORDS: &[&str] = &["none", "and", "task"];

/// Numeric tokens become `task-<n>`; lowercase id-like tokens are kept
/// verbatim; everything else is free text.
pub fn tokenize_dependencies(value: &str) -> Vec<String> {
    let mut deps: Vec<String> = Vec::new();
    let tokens = value
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty());

    for token in tokens {
        let dep = if token.chars().all(|c| c.is_ascii_digit()) {
            match token.parse::<u32>() {
                Ok(n) => format!("task-{n}"),
                Err(_) => continue,
            }
        } else if token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
            && !IGNORED_DEPENDENCY_WORDS.contains(&token)
        {
            token.to_string()
        } else {
            continue;
        };

        if !deps.contains(&dep) {
            deps.push(dep);
        }
    }
    deps
}

fn parse_priority(value: &str) -> Option<u32> {
    static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER_REGEX.get_or_init(|| Regex::new(r"\d+").unwrap());
    re.find(value)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|p| *p > 0)
}

fn parse_worker(value: &str) -> Option<TaskType> {
    value.parse::<TaskType>().ok().or_else(|| {
        value
            .split_whitespace()
            .find_map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '-').parse().ok())
    })
}
