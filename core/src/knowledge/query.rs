use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::KnowledgeConfig;
use crate::decompose::{TaskRecord, TaskType};
use crate::graph::{EdgePayload, NodePayload};

use super::keywords::extract_keywords;
use super::types::{KnowledgeGraph, KnowledgeNode};

/// What a relevance query is about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceQuery {
    pub content: String,
    #[serde(default)]
    pub task_type: Option<TaskType>,
}

impl RelevanceQuery {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            task_type: None,
        }
    }

    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }
}

impl From<&TaskRecord> for RelevanceQuery {
    fn from(task: &TaskRecord) -> Self {
        Self::new(task.query_text()).with_task_type(task.task_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRelationship {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    pub total_entities: usize,
    pub total_relationships: usize,
    pub entity_types: BTreeMap<String, usize>,
    pub relationship_types: BTreeMap<String, usize>,
}

/// Selected subgraph handed to the compressor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextBundle {
    pub entities: Vec<ContextEntity>,
    pub relationships: Vec<ContextRelationship>,
    pub summary: ContextSummary,
}

impl ContextBundle {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredNode {
    pub id: String,
    pub score: f64,
}

pub(crate) fn type_bonus(
    cfg: &KnowledgeConfig,
    task_type: Option<TaskType>,
    node: &KnowledgeNode,
) -> f64 {
    let Some(task_type) = task_type else {
        return 0.0;
    };
    if cfg
        .bonus_pairs
        .iter()
        .any(|p| p.task_type == task_type && p.node_kind == node.kind())
    {
        cfg.type_bonus
    } else {
        0.0
    }
}

pub(crate) fn lexical_relevance(keywords: &[String], node: &KnowledgeNode) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let text = node.search_text();
    let matched = keywords.iter().filter(|k| text.contains(k.as_str())).count();
    matched as f64 / keywords.len() as f64
}

/// Scores every node, drops zero scores and sorts best first. Ties keep
/// graph insertion order.
pub(crate) fn rank_nodes(
    graph: &KnowledgeGraph,
    cfg: &KnowledgeConfig,
    query: &RelevanceQuery,
) -> Vec<ScoredNode> {
    let keywords = extract_keywords(&query.content);
    tracing::debug!(?keywords, "ranking knowledge graph nodes");

    let mut scored: Vec<ScoredNode> = graph
        .nodes()
        .filter_map(|(id, node)| {
            let score =
                lexical_relevance(&keywords, node) + type_bonus(cfg, query.task_type, node);
            (score > 0.0).then(|| ScoredNode {
                id: id.to_string(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}

pub(crate) fn build_bundle(graph: &KnowledgeGraph, selected: &[ScoredNode]) -> ContextBundle {
    let mut bundle = ContextBundle::default();

    for scored in selected {
        let Some(node) = graph.node(&scored.id) else {
            continue;
        };
        *bundle
            .summary
            .entity_types
            .entry(node.kind().to_string())
            .or_default() += 1;
        bundle.entities.push(ContextEntity {
            id: scored.id.clone(),
            kind: node.kind().to_string(),
            data: node.attributes(),
            score: scored.score,
        });
    }

    let ids: HashSet<&str> = bundle.entities.iter().map(|e| e.id.as_str()).collect();
    for edge in graph.edges_within(&ids) {
        *bundle
            .summary
            .relationship_types
            .entry(edge.data.kind().to_string())
            .or_default() += 1;
        bundle.relationships.push(ContextRelationship {
            from: edge.from.clone(),
            to: edge.to.clone(),
            kind: edge.data.kind().to_string(),
            data: edge.data.data(),
        });
    }

    bundle.summary.total_entities = bundle.entities.len();
    bundle.summary.total_relationships = bundle.relationships.len();
    bundle
}
