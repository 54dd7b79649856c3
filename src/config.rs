//! Application configuration
//!
//! Settings come from an optional YAML file, then environment variables,
//! then CLI flags (applied by the runner), later sources winning.
//!
//! ```yaml
//! database:
//!   path: data/pagination.duckdb
//!   table: pagination_dataset
//! server:
//!   host: 0.0.0.0
//!   port: 8000
//!   query_timeout_ms: 5000
//! ```

use crate::error::{Error, Result};
use crate::storage::{is_valid_identifier, DEFAULT_TABLE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `database.path`
pub const ENV_DB_PATH: &str = "PAGEWISE_DB_PATH";
/// Environment variable overriding `database.table`
pub const ENV_DB_TABLE: &str = "PAGEWISE_DB_TABLE";
/// Environment variable overriding `server.host`
pub const ENV_HOST: &str = "PAGEWISE_HOST";
/// Environment variable overriding `server.port`
pub const ENV_PORT: &str = "PAGEWISE_PORT";
/// Environment variable overriding `server.query_timeout_ms`
pub const ENV_QUERY_TIMEOUT_MS: &str = "PAGEWISE_QUERY_TIMEOUT_MS";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Dataset storage
    #[serde(default)]
    pub database: DatabaseConfig,

    /// HTTP server
    #[serde(default)]
    pub server: ServerSettings,
}

impl AppConfig {
    /// Parse a config from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_yaml(&text)
    }

    /// Load from an optional file and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides looked up by variable name
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database.path = if path.is_empty() || path == ":memory:" {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        if let Some(table) = lookup(ENV_DB_TABLE) {
            self.database.table = table;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = parse_env(ENV_PORT, &port)?;
        }
        if let Some(timeout) = lookup(ENV_QUERY_TIMEOUT_MS) {
            self.server.query_timeout_ms = parse_env(ENV_QUERY_TIMEOUT_MS, &timeout)?;
        }
        Ok(())
    }

    /// Validate the config
    pub fn validate(&self) -> Result<()> {
        if !is_valid_identifier(&self.database.table) {
            return Err(Error::invalid_config(
                "database.table",
                format!("'{}' is not a valid SQL identifier", self.database.table),
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(Error::invalid_config("server.host", "must not be empty"));
        }
        if self.server.port == 0 {
            return Err(Error::invalid_config("server.port", "must not be 0"));
        }
        if self.server.query_timeout_ms == 0 {
            return Err(Error::invalid_config(
                "server.query_timeout_ms",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_config(key, format!("cannot parse '{value}'")))
}

// ============================================================================
// Database
// ============================================================================

/// Where the dataset lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file; in-memory when absent
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Table holding the dataset
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            table: default_table(),
        }
    }
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

// ============================================================================
// Server
// ============================================================================

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deadline for one pagination call, in milliseconds
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

impl ServerSettings {
    /// Per-call deadline
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_query_timeout_ms() -> u64 {
    5_000
}
