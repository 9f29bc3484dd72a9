use std::path::Path;

use tokio::io::AsyncReadExt;

use crate::commands::cli::InputArgs;
use crate::error::CliError;

pub async fn read_prompt(args: &InputArgs) -> Result<String, CliError> {
    let text = if let Some(prompt) = &args.prompt {
        prompt.clone()
    } else if let Some(path) = &args.prompt_file {
        tokio::fs::read_to_string(path).await?
    } else if args.stdin {
        read_stdin().await?
    } else {
        return Err(CliError::Input(
            "one of --prompt, --prompt-file or --stdin is required".into(),
        ));
    };

    if text.trim().is_empty() {
        return Err(CliError::Input("prompt is empty".into()));
    }
    Ok(text)
}

pub async fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await?;
    Ok(buf)
}

pub async fn read_json(path: Option<&Path>) -> Result<serde_json::Value, CliError> {
    let raw = match path {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => read_stdin().await?,
    };
    Ok(serde_json::from_str(&raw)?)
}
