//! Configuration for the Roster server binary.
//!
//! Values come from an optional TOML file overlaid with `ROSTER_*`
//! environment variables. Nested keys use `__`, so `ROSTER_HTTP__PORT=9000`
//! sets `http.port`. Every section has defaults, so an empty file is valid.

use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat};
use roster_cache::CacheConfig;
use roster_core::{
  ConfigError, Validator,
  validate::AgeBounds,
};
use roster_ingest::{EnrichmentConfig, queue::QueueConfig};
use serde::Deserialize;
use tracing::level_filters::{LevelFilter, ParseLevelFilterError};

// ─── Sections ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
  pub host: String,
  pub port: u16,
}

impl Default for HttpConfig {
  fn default() -> Self { Self { host: "0.0.0.0".to_string(), port: 8080 } }
}

impl HttpConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// SQLite database file. A leading `~/` is expanded.
  pub path: PathBuf,
}

impl Default for StoreConfig {
  fn default() -> Self { Self { path: PathBuf::from("roster.db") } }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
  pub min_age: i64,
  pub max_age: i64,
}

impl Default for ValidationConfig {
  fn default() -> Self {
    let bounds = AgeBounds::default();
    Self { min_age: bounds.min, max_age: bounds.max }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Default level when `RUST_LOG` is unset, e.g. `info` or `debug`.
  pub level: String,
}

impl Default for LogConfig {
  fn default() -> Self { Self { level: "info".to_string() } }
}

impl LogConfig {
  pub fn level_filter(&self) -> Result<LevelFilter, ParseLevelFilterError> { self.level.parse() }
}

// ─── Root ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub log:        LogConfig,
  pub http:       HttpConfig,
  pub store:      StoreConfig,
  pub cache:      CacheConfig,
  pub enrichment: EnrichmentConfig,
  pub queue:      QueueConfig,
  pub validation: ValidationConfig,
}

impl Config {
  /// Read `path` (if it exists) and overlay the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(environment())
      .build()?
      .try_deserialize()
  }

  /// Parse a TOML document without consulting the environment.
  pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()?
      .try_deserialize()
  }

  pub fn validator(&self) -> Result<Validator, ConfigError> {
    Validator::new(AgeBounds { min: self.validation.min_age, max: self.validation.max_age })
  }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store.path) }
}

fn environment() -> Environment {
  Environment::with_prefix("ROSTER")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
    .list_separator(",")
    .with_list_parse_key("queue.brokers")
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
