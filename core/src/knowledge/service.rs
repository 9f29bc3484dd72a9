use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::config::KnowledgeConfig;

use super::issues::{match_error_patterns, PatternMatch};
use super::profile::{AbilityProfile, ProfileCache};
use super::query::{build_bundle, rank_nodes, ContextBundle, RelevanceQuery};
use super::scan::{DependencySpec, ProjectScan, ScannedEntity};
use super::seed::seed_baseline;
use super::types::{
    CodeEntityNode, DependencyNode, FileNode, KnowledgeEdge, KnowledgeGraph, KnowledgeNode,
};

/// Graph service shared between an ingesting writer and querying readers.
pub type SharedKnowledgeGraph = Arc<RwLock<KnowledgeGraphService>>;

/// What one ingestion pass touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    pub nodes_added: usize,
    pub nodes_merged: usize,
    pub edges_added: usize,
    pub unresolved_calls: usize,
}

impl IngestStats {
    fn record_node(&mut self, added: bool) {
        if added {
            self.nodes_added += 1;
        } else {
            self.nodes_merged += 1;
        }
    }
}

#[derive(Debug)]
pub struct KnowledgeGraphService {
    graph: KnowledgeGraph,
    config: KnowledgeConfig,
    profiles: ProfileCache,
}

impl KnowledgeGraphService {
    pub fn new(config: KnowledgeConfig) -> Self {
        let mut graph = KnowledgeGraph::new();
        seed_baseline(&mut graph);
        let profiles = ProfileCache::new(config.profile_cache_capacity);
        Self {
            graph,
            config,
            profiles,
        }
    }

    pub fn shared(self) -> SharedKnowledgeGraph {
        Arc::new(RwLock::new(self))
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn config(&self) -> &KnowledgeConfig {
        &self.config
    }

    pub fn build_project_graph(&mut self, scan: &ProjectScan) -> IngestStats {
        let mut stats = IngestStats::default();
        let edges_before = self.graph.edge_count();

        for file in &scan.files {
            let added = self.graph.upsert_node(
                KnowledgeNode::file_id(&file.path),
                KnowledgeNode::File(FileNode {
                    path: file.path.clone(),
                    language: file.language.clone(),
                    size: file.size,
                }),
            );
            stats.record_node(added);
        }

        for dep in &scan.dependencies.direct {
            self.ingest_dependency(dep, true, &mut stats);
        }
        for dep in &scan.dependencies.transitive {
            self.ingest_dependency(dep, false, &mut stats);
        }

        let mut by_name: HashMap<&str, String> = HashMap::new();
        let mut by_name_file: HashMap<(&str, &str), String> = HashMap::new();
        for entity in &scan.code_entities {
            let id = entity_id(entity);
            by_name.entry(entity.name.as_str()).or_insert_with(|| id.clone());
            by_name_file
                .entry((entity.name.as_str(), entity.file.as_str()))
                .or_insert_with(|| id.clone());

            let added = self.graph.upsert_node(
                id.clone(),
                KnowledgeNode::CodeEntity(CodeEntityNode {
                    entity_type: entity.entity_type.clone(),
                    name: entity.name.clone(),
                    file: entity.file.clone(),
                    line: entity.line,
                    column: entity.column,
                }),
            );
            stats.record_node(added);
            self.graph.add_edge(
                KnowledgeNode::file_id(&entity.file),
                id,
                KnowledgeEdge::Contains,
            );
        }

        for import in &scan.imports {
            self.graph.add_edge(
                KnowledgeNode::file_id(&import.from),
                KnowledgeNode::file_id(&import.to),
                KnowledgeEdge::Imports,
            );
        }

        let resolve = |name: &str, file: Option<&String>| -> Option<String> {
            match file {
                Some(file) => by_name_file.get(&(name, file.as_str())).cloned(),
                None => by_name.get(name).cloned(),
            }
        };
        for call in &scan.function_calls {
            let caller = resolve(&call.caller, call.caller_file.as_ref());
            let callee = resolve(&call.callee, call.callee_file.as_ref());
            let (Some(caller), Some(callee)) = (caller, callee) else {
                tracing::debug!(caller = %call.caller, callee = %call.callee, "skipping unresolved call");
                stats.unresolved_calls += 1;
                continue;
            };
            self.graph.add_edge(
                caller,
                callee,
                KnowledgeEdge::Calls {
                    count: call.count.unwrap_or(1),
                },
            );
        }

        stats.edges_added = self.graph.edge_count() - edges_before;
        tracing::info!(
            nodes_added = stats.nodes_added,
            nodes_merged = stats.nodes_merged,
            edges_added = stats.edges_added,
            total_nodes = self.graph.node_count(),
            "project graph ingested"
        );
        stats
    }

    fn ingest_dependency(&mut self, dep: &DependencySpec, is_direct: bool, stats: &mut IngestStats) {
        // Explicit stack: dependency trees from lockfiles can nest deeply.
        let mut stack: Vec<(&DependencySpec, bool)> = vec![(dep, is_direct)];
        while let Some((spec, direct)) = stack.pop() {
            let id = KnowledgeNode::dependency_id(&spec.name);
            let added = self.graph.upsert_node(
                id.clone(),
                KnowledgeNode::Dependency(DependencyNode {
                    name: spec.name.clone(),
                    version: spec.version.clone(),
                    is_direct: direct,
                }),
            );
            stats.record_node(added);

            for child in spec.dependencies.iter().rev() {
                self.graph.add_edge(
                    id.clone(),
                    KnowledgeNode::dependency_id(&child.name),
                    KnowledgeEdge::Requires,
                );
                stack.push((child, false));
            }
        }
    }

    /// Ranks graph nodes against the query and returns the selected subgraph.
    pub fn get_relevant_context(
        &self,
        query: &RelevanceQuery,
        max_nodes: Option<usize>,
    ) -> ContextBundle {
        if query.content.trim().is_empty() {
            return ContextBundle::default();
        }
        let limit = max_nodes.unwrap_or(self.config.max_nodes);
        let mut ranked = rank_nodes(&self.graph, &self.config, query);
        ranked.truncate(limit);
        build_bundle(&self.graph, &ranked)
    }

    pub fn match_error_patterns(&self, error: &str) -> Vec<PatternMatch> {
        match_error_patterns(&self.graph, error)
    }

    pub fn ability_profile(&mut self, user_id: &str) -> AbilityProfile {
        self.profiles.get_or_compute(user_id)
    }

    /// Inserts a caller-tagged node. Returns true when the id was new.
    pub fn add_custom_node(
        &mut self,
        id: impl Into<String>,
        tag: impl Into<String>,
        attributes: Map<String, Value>,
    ) -> bool {
        self.graph.upsert_node(
            id,
            KnowledgeNode::Custom {
                tag: tag.into(),
                attributes,
            },
        )
    }

    pub fn add_custom_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        label: impl Into<String>,
        data: Option<Value>,
    ) {
        self.graph.add_edge(
            from,
            to,
            KnowledgeEdge::Custom {
                label: label.into(),
                data,
            },
        );
    }
}

fn entity_id(entity: &ScannedEntity) -> String {
    KnowledgeNode::code_entity_id(&entity.entity_type, &entity.name, &entity.file, entity.line)
}
