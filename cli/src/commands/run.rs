use taskloom_core::api::{AppConfig, Orchestrator, RunRequest, Services};

use crate::commands::cli::RunArgs;
use crate::commands::input::read_prompt;
use crate::commands::knowledge::load_knowledge;
use crate::error::CliError;

pub async fn handle_run(args: RunArgs, cfg: &AppConfig, services: Services) -> Result<i32, CliError> {
    let prompt = read_prompt(&args.input).await?;

    let mut cfg = cfg.clone();
    if let Some(n) = args.max_retries {
        cfg.executor.max_retries = n;
    }
    cfg.executor.continue_on_failure |= args.continue_on_failure;

    let knowledge = load_knowledge(&cfg, args.scan.as_deref())?.shared();
    let orchestrator = Orchestrator::new(&cfg, services, knowledge);

    let request = RunRequest {
        prompt,
        user_id: args.user_id,
        project_type: args.project_type,
        max_tokens: args.max_tokens,
    };
    let report = orchestrator.run(request).await?;
    eprintln!("{}", serde_json::to_string_pretty(&report)?);

    if report.succeeded() {
        Ok(0)
    } else {
        Err(CliError::TasksFailed {
            failed: report.failed(),
            skipped: report.skipped(),
        })
    }
}
