use taskloom_core::api::{AppConfig, TaskDecomposer};

use crate::commands::cli::{OutputFormat, PlanArgs};
use crate::commands::input::read_prompt;
use crate::error::CliError;

pub async fn handle_plan(args: PlanArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let input = read_prompt(&args.input).await?;

    let mut decomposer_cfg = cfg.decomposer.clone();
    decomposer_cfg.strict_dependencies |= args.strict;
    let plan = TaskDecomposer::new(&decomposer_cfg)
        .decompose(&input)
        .map_err(taskloom_core::api::OrchestratorError::from)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => {
            for (i, task) in plan.order.iter().enumerate() {
                let deps = if task.dependencies.is_empty() {
                    "-".to_string()
                } else {
                    task.dependencies.join(", ")
                };
                println!(
                    "{:>2}. {} [{}] p{} deps: {}  {}",
                    i + 1,
                    task.task_id,
                    task.task_type,
                    task.priority,
                    deps,
                    task.task_name
                );
            }
            for d in &plan.dangling {
                println!("    ! {} depends on unknown {}", d.task_id, d.missing_dep);
            }
        }
    }
    Ok(0)
}
