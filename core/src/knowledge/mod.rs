//! Project knowledge graph.
//!
//! ```text
//!  ProjectScan ──► build_project_graph ──► KnowledgeGraph (seeded baseline)
//!                                               │
//!  RelevanceQuery ──► rank_nodes ──► top-N ─────┴──► ContextBundle
//!  error text ──► errorPattern match ─┐
//!  error text ──► IssueSearch ────────┴──► RelatedIssues
//! ```
//!
//! Node ids are kind-prefixed (`file:`, `dependency:`, `codeEntity:`, ...),
//! so the same id always denotes the same entity across ingestion passes.

mod issues;
mod keywords;
mod profile;
mod query;
mod scan;
mod seed;
mod service;
mod types;

pub use issues::{search_issue_references, IssueReference, IssueSearch, PatternMatch, RelatedIssues};
pub use keywords::extract_keywords;
pub use profile::{AbilityProfile, ProfileCache, SkillLevel};
pub use query::{
    ContextBundle, ContextEntity, ContextRelationship, ContextSummary, RelevanceQuery, ScoredNode,
};
pub use scan::{
    CallRecord, DependencySpec, DependencyTree, ImportRecord, ProjectScan, ScannedEntity,
    ScannedFile,
};
pub use seed::seed_baseline;
pub use service::{IngestStats, KnowledgeGraphService, SharedKnowledgeGraph};
pub use types::{
    CodeEntityNode, DependencyNode, ErrorPatternNode, FileNode, FrameworkNode, KnowledgeEdge,
    KnowledgeGraph, KnowledgeNode,
};
