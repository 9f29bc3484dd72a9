use std::path::Path;

use taskloom_core::api::{
    search_issue_references, AppConfig, IssueSearch, KnowledgeGraphService, ProjectScan,
    RelatedIssues, RelevanceQuery,
};

use crate::commands::cli::{ContextArgs, IssuesArgs};
use crate::error::CliError;

/// Seeded graph, plus the project scan when one is given.
pub fn load_knowledge(cfg: &AppConfig, scan: Option<&Path>) -> Result<KnowledgeGraphService, CliError> {
    let mut svc = KnowledgeGraphService::new(cfg.knowledge.clone());
    if let Some(path) = scan {
        let scan = ProjectScan::from_path(path)?;
        let stats = svc.build_project_graph(&scan);
        tracing::debug!(?stats, path = %path.display(), "project scan loaded");
    }
    Ok(svc)
}

pub async fn handle_context(args: ContextArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let svc = load_knowledge(cfg, args.scan.as_deref())?;
    let mut query = RelevanceQuery::new(args.query);
    query.task_type = args.task_type;

    let bundle = svc.get_relevant_context(&query, args.max_nodes);
    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(0)
}

pub async fn handle_issues(
    args: IssuesArgs,
    cfg: &AppConfig,
    search: Option<&dyn IssueSearch>,
) -> Result<i32, CliError> {
    let svc = load_knowledge(cfg, args.scan.as_deref())?;
    let related = RelatedIssues {
        patterns: svc.match_error_patterns(&args.error),
        references: search_issue_references(search, &args.error).await,
    };
    println!("{}", serde_json::to_string_pretty(&related)?);
    Ok(0)
}
