use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::keywords::extract_keywords;
use super::query::lexical_relevance;
use super::types::{KnowledgeGraph, KnowledgeNode};

/// Minimum keyword overlap for a pattern that is not quoted verbatim.
const MIN_PATTERN_OVERLAP: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub id: String,
    pub pattern: String,
    pub description: String,
    pub solutions: Vec<String>,
    pub score: f64,
    /// Frameworks this pattern is known to occur in.
    pub frameworks: Vec<String>,
}

/// External reference (issue tracker thread, Q&A answer, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReference {
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedIssues {
    pub patterns: Vec<PatternMatch>,
    pub references: Vec<IssueReference>,
}

/// Looks an error message up in an external source.
#[async_trait]
pub trait IssueSearch: Send + Sync {
    fn name(&self) -> &str;
    async fn search(&self, error: &str) -> anyhow::Result<Vec<IssueReference>>;
}

/// Runs an external lookup. A failing source is logged and contributes no
/// references.
pub async fn search_issue_references(
    search: Option<&dyn IssueSearch>,
    error: &str,
) -> Vec<IssueReference> {
    let Some(search) = search else {
        return Vec::new();
    };
    match search.search(error).await {
        Ok(refs) => refs,
        Err(err) => {
            tracing::warn!(source = search.name(), error = %err, "issue search failed");
            Vec::new()
        }
    }
}

pub(crate) fn match_error_patterns(graph: &KnowledgeGraph, error: &str) -> Vec<PatternMatch> {
    let lowered = error.to_lowercase();
    let keywords = extract_keywords(error);

    let mut matches: Vec<PatternMatch> = graph
        .nodes()
        .filter_map(|(id, node)| {
            let KnowledgeNode::ErrorPattern(pattern) = node else {
                return None;
            };
            let score = if lowered.contains(&pattern.pattern.to_lowercase()) {
                1.0
            } else {
                lexical_relevance(&keywords, node)
            };
            if score < MIN_PATTERN_OVERLAP {
                return None;
            }
            let frameworks = graph
                .edges_from(id)
                .filter(|e| e.to.starts_with("framework:"))
                .map(|e| e.to.trim_start_matches("framework:").to_string())
                .collect();
            Some(PatternMatch {
                id: id.to_string(),
                pattern: pattern.pattern.clone(),
                description: pattern.description.clone(),
                solutions: pattern.solutions.clone(),
                score,
                frameworks,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches
}
