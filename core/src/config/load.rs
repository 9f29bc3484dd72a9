use std::path::{Path, PathBuf};

use super::types::{AppConfig, LoggingConfig};

/// Get the default taskloom data directory: ~/.taskloom
pub fn get_taskloom_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".taskloom"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    let cfg = toml::from_str::<AppConfig>(&s)?;
    Ok(cfg)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.taskloom/config.toml
    let user_config = get_taskloom_data_dir()?.join("config.toml");

    // Priority 2: ./taskloom.toml (current directory)
    let local_config = Path::new("taskloom.toml");

    let mut cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

/// Log file directory: the configured one, else `~/.taskloom/logs`, else the
/// OS temp dir.
pub fn resolve_log_dir(logging: &LoggingConfig) -> PathBuf {
    log_dir_from(logging, get_taskloom_data_dir().ok())
}

fn log_dir_from(logging: &LoggingConfig, data_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return PathBuf::from(dir);
    }
    match data_dir {
        Some(dir) => dir.join("logs"),
        None => std::env::temp_dir().join("taskloom"),
    }
}

fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("TASKLOOM_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.logging.level = v;
        }
    }
    if let Ok(v) = std::env::var("TASKLOOM_MAX_TOKENS") {
        match v.trim().parse::<usize>() {
            Ok(n) => cfg.compressor.max_tokens = n,
            Err(_) => tracing::warn!("ignoring invalid TASKLOOM_MAX_TOKENS={v:?}"),
        }
    }
}
