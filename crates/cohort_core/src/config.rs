//! Data source and logging configuration.
//!
//! # Responsibility
//! - Describe where the records database lives and how to reach it.
//! - Load settings from JSON files or `COHORT_*` environment variables.
//!
//! # Invariants
//! - Loading never validates reachability; `ConnectionProvider::new` does.
//! - Unknown JSON keys are rejected instead of silently ignored.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_DRIVER: &str = "COHORT_DB_DRIVER";
pub const ENV_DB_URL: &str = "COHORT_DB_URL";
pub const ENV_DB_BUSY_TIMEOUT_MS: &str = "COHORT_DB_BUSY_TIMEOUT_MS";

const DEFAULT_DRIVER: &str = "sqlite";
const DEFAULT_URL: &str = "sqlite::memory:";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    MissingVar(&'static str),
    InvalidVar { name: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::MissingVar(name) => write!(f, "environment variable `{name}` is not set"),
            Self::InvalidVar { name, value } => {
                write!(f, "environment variable `{name}` has invalid value `{value}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::MissingVar(_) => None,
            Self::InvalidVar { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Connection settings for the records database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSourceConfig {
    /// Driver identity. Only `sqlite` is supported.
    pub driver: String,
    /// `sqlite:<path>` or `sqlite::memory:`.
    pub url: String,
    /// Per-connection busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_string(),
            url: DEFAULT_URL.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl DataSourceConfig {
    /// SQLite data source at `url` with default driver and timeout.
    pub fn sqlite(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Reads `COHORT_DB_URL` (required), `COHORT_DB_DRIVER` and
    /// `COHORT_DB_BUSY_TIMEOUT_MS` (optional) from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(ENV_DB_URL).ok_or(ConfigError::MissingVar(ENV_DB_URL))?;
        let mut config = Self::sqlite(url);

        if let Some(driver) = lookup(ENV_DB_DRIVER) {
            config.driver = driver;
        }
        if let Some(value) = lookup(ENV_DB_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms =
                value.trim().parse().map_err(|_| ConfigError::InvalidVar {
                    name: ENV_DB_BUSY_TIMEOUT_MS,
                    value,
                })?;
        }

        Ok(config)
    }
}

/// Top-level settings file layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data_source: DataSourceConfig,
    pub logging: Option<LoggingConfig>,
}

impl AppConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}
