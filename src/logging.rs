//! Optional file logging for the binaries.
//!
//! The terminal UI owns stdout, so traces only go to a file, and only when
//! `CANDY_LOG_PATH` is set. `CANDY_LOG` takes an `EnvFilter` directive
//! (default `info`).

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_PATH_VAR: &str = "CANDY_LOG_PATH";
pub const LOG_FILTER_VAR: &str = "CANDY_LOG";

/// Trimmed, non-empty log path from the environment
pub fn log_path_from_env() -> Option<String> {
    std::env::var(LOG_PATH_VAR)
        .ok()
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
}

/// Install the global subscriber if a log path is configured.
///
/// Returns whether logging was enabled.
pub fn init_from_env() -> Result<bool> {
    let Some(path) = log_path_from_env() else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {path}"))?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;

    tracing::info!(path = %path, "logging enabled");
    Ok(true)
}
