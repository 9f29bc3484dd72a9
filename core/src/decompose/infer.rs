use super::types::TaskType;

/// Keyword policy, checked in order; first match wins.
const TYPE_KEYWORDS: &[(&[&str], TaskType)] = &[
    (&["scan", "project"], TaskType::ProjectScan),
    (&["analyze", "static"], TaskType::StaticAnalysis),
    (&["depend", "package"], TaskType::DependencyCheck),
    (&["innovat", "suggest"], TaskType::InnovationSuggestion),
    (&["knowledge", "graph"], TaskType::Knowledge),
];

/// Infer the worker category from a task's name and description.
pub fn infer_task_type(name: &str, description: &str) -> TaskType {
    let text = format!("{name} {description}").to_lowercase();
    TYPE_KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| text.contains(w)))
        .map(|(_, t)| *t)
        .unwrap_or(TaskType::LocalData)
}
