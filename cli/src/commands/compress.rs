use taskloom_core::api::{AppConfig, ContextCompressor};
use taskloom_plugins::factory;

use crate::commands::cli::CompressArgs;
use crate::commands::input::read_json;
use crate::error::CliError;

pub async fn handle_compress(args: CompressArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let context = read_json(args.context.as_deref()).await?;
    let compressor = ContextCompressor::new(
        cfg.compressor.clone(),
        factory::build_summarizer(cfg),
        factory::build_prioritizer(cfg),
    );
    let out = compressor.compress(&context, args.max_tokens);
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(0)
}
