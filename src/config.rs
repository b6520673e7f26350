use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::browse::BrowseSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  /// Stores the user can switch between
  #[serde(default)]
  pub stores: Vec<String>,
  pub default_store: Option<String>,
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
  #[serde(default)]
  pub browse: BrowseConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  pub url: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  15
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
  pub page_size: u32,
  pub search_debounce_ms: u64,
  /// Maximum pages kept per view (0 = unbounded)
  pub cache_capacity: usize,
}

impl Default for BrowseConfig {
  fn default() -> Self {
    Self {
      page_size: 10,
      search_debounce_ms: 500,
      cache_capacity: 64,
    }
  }
}

impl From<&BrowseConfig> for BrowseSettings {
  fn from(config: &BrowseConfig) -> Self {
    Self {
      page_size: config.page_size,
      search_debounce: Duration::from_millis(config.search_debounce_ms),
      cache_capacity: config.cache_capacity,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
  /// Filter directive, e.g. "info" or "storefront=debug"
  pub level: Option<String>,
  /// Directory for log files (default: $XDG_STATE_HOME/storefront or data dir)
  pub directory: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./storefront.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/storefront/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/storefront/config.yaml\n\
                 with at least `api: {{ url: https://... }}`."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("storefront.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("storefront").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    if config.browse.page_size == 0 {
      return Err(eyre!("browse.page_size must be at least 1"));
    }
    Ok(config)
  }

  /// Store to open on startup: the configured default, else the first listed.
  pub fn initial_store(&self) -> Option<String> {
    self
      .default_store
      .clone()
      .or_else(|| self.stores.first().cloned())
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.api.timeout_secs)
  }

  /// Get the API token from environment variables, if any.
  ///
  /// Checks STOREFRONT_API_TOKEN first, then API_TOKEN as fallback.
  pub fn get_api_token() -> Option<String> {
    std::env::var("STOREFRONT_API_TOKEN")
      .or_else(|_| std::env::var("API_TOKEN"))
      .ok()
      .filter(|token| !token.trim().is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_minimal_config_uses_defaults() {
    let config = Config::parse("api:\n  url: https://api.example.com\n").unwrap();
    assert_eq!(config.api.timeout_secs, 15);
    assert_eq!(config.browse.page_size, 10);
    assert_eq!(config.browse.search_debounce_ms, 500);
    assert!(config.stores.is_empty());
    assert_eq!(config.initial_store(), None);
  }

  #[test]
  fn test_full_config() {
    let yaml = r#"
api:
  url: https://api.example.com/v1
  timeout_secs: 5
stores: [store-1, store-2]
title: Corner Shop
browse:
  page_size: 25
  search_debounce_ms: 300
log:
  level: debug
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.initial_store().as_deref(), Some("store-1"));
    assert_eq!(config.timeout(), Duration::from_secs(5));
    assert_eq!(config.browse.cache_capacity, 64);

    let settings = BrowseSettings::from(&config.browse);
    assert_eq!(settings.page_size, 25);
    assert_eq!(settings.search_debounce, Duration::from_millis(300));
    assert_eq!(config.log.level.as_deref(), Some("debug"));
  }

  #[test]
  fn test_default_store_wins() {
    let yaml = "api: { url: http://localhost }\nstores: [a, b]\ndefault_store: b\n";
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.initial_store().as_deref(), Some("b"));
  }

  #[test]
  fn test_zero_page_size_is_rejected() {
    let yaml = "api: { url: http://localhost }\nbrowse: { page_size: 0 }\n";
    assert!(Config::parse(yaml).is_err());
  }

  #[test]
  fn test_missing_explicit_path() {
    assert!(Config::load(Some(Path::new("/nonexistent/storefront.yaml"))).is_err());
  }
}
