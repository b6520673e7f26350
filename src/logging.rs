//! File logging. The terminal UI owns stdout, so all tracing output goes to a
//! daily-rotated file instead.

use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogConfig;

const LOG_ENV: &str = "STOREFRONT_LOG";
const LOG_FILE_PREFIX: &str = "storefront.log";

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the app or buffered lines are lost on exit.
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
  let dir = match &config.directory {
    Some(dir) => dir.clone(),
    None => default_log_dir()?,
  };
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let file_layer = fmt::layer()
    .with_writer(writer)
    .with_target(true)
    .with_ansi(false);

  tracing_subscriber::registry()
    .with(env_filter(config.level.as_deref()))
    .with(file_layer)
    .try_init()
    .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

  Ok(guard)
}

/// `STOREFRONT_LOG` wins over the configured level; anything unparsable
/// falls back to `info`.
fn env_filter(configured: Option<&str>) -> EnvFilter {
  EnvFilter::try_from_env(LOG_ENV)
    .or_else(|_| EnvFilter::try_new(configured.unwrap_or("info")))
    .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn default_log_dir() -> Result<PathBuf> {
  let base = dirs::state_dir()
    .or_else(dirs::data_dir)
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine log directory"))?;

  Ok(base.join("storefront"))
}

