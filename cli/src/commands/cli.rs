use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use taskloom_core::api::TaskType;

#[derive(Parser, Debug)]
#[command(name = "taskloom", version, about = "Decompose, plan and dispatch tasks with project context")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to load instead of ~/.taskloom/config.toml or ./taskloom.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a task breakdown and print the execution order.
    Plan(PlanArgs),
    /// Rank project knowledge against a query.
    Context(ContextArgs),
    /// Match an error message against known patterns.
    Issues(IssuesArgs),
    /// Compress a context object to a token budget.
    Compress(CompressArgs),
    /// Plan, enrich and dispatch every task.
    Run(RunArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InputArgs {
    #[arg(long, group = "input")]
    pub prompt: Option<String>,

    #[arg(long, group = "input")]
    pub prompt_file: Option<PathBuf>,

    #[arg(long, group = "input")]
    pub stdin: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Fail on dependencies that name no task in the breakdown.
    #[arg(long)]
    pub strict: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ContextArgs {
    /// Project scan bundle (JSON).
    #[arg(long)]
    pub scan: Option<PathBuf>,

    #[arg(long)]
    pub query: String,

    #[arg(long, value_parser = parse_task_type)]
    pub task_type: Option<TaskType>,

    #[arg(long)]
    pub max_nodes: Option<usize>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct IssuesArgs {
    #[arg(long)]
    pub error: String,

    #[arg(long)]
    pub scan: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CompressArgs {
    /// Context object file (JSON); read from stdin when omitted.
    #[arg(long)]
    pub context: Option<PathBuf>,

    #[arg(long)]
    pub max_tokens: Option<usize>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long)]
    pub scan: Option<PathBuf>,

    #[arg(long)]
    pub user_id: Option<String>,

    #[arg(long)]
    pub project_type: Option<String>,

    #[arg(long)]
    pub max_tokens: Option<usize>,

    #[arg(long)]
    pub max_retries: Option<u32>,

    #[arg(long)]
    pub continue_on_failure: bool,
}

fn parse_task_type(s: &str) -> Result<TaskType, String> {
    s.parse::<TaskType>()
        .map_err(|_| format!("unknown task type '{s}'"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_run_flags() {
        let args = Args::parse_from([
            "taskloom",
            "run",
            "--prompt",
            "Task 1: A",
            "--user-id",
            "u1",
            "--max-tokens",
            "500",
        ]);
        let Commands::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.input.prompt.as_deref(), Some("Task 1: A"));
        assert_eq!(run.max_tokens, Some(500));
        assert!(!run.continue_on_failure);
    }

    #[test]
    fn task_type_is_validated() {
        let ok = Args::try_parse_from([
            "taskloom",
            "context",
            "--query",
            "deps",
            "--task-type",
            "dependency-check",
        ]);
        assert!(ok.is_ok());
        let bad = Args::try_parse_from([
            "taskloom",
            "context",
            "--query",
            "deps",
            "--task-type",
            "bogus thing",
        ]);
        assert!(bad.is_err());
    }
}
