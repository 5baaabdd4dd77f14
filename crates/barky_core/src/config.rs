//! Process configuration for barky entry points.
//!
//! # Responsibility
//! - Hold the store path, audit file path, broadcast topic and logging setup.
//! - Resolve `BARKY_*` environment overrides on top of defaults.
//!
//! # Invariants
//! - Blank environment values are ignored, never applied.
//! - A config returned by `from_env`/`validate` carries a valid topic.

use crate::hooks::broadcast::{validate_topic, PublishError};
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "barky.sqlite3";
pub const DEFAULT_AUDIT_CSV_FILE_NAME: &str = "bookmarks.csv";
pub const DEFAULT_BROADCAST_TOPIC: &str = "bookmarks";

pub const ENV_DB_PATH: &str = "BARKY_DB_PATH";
pub const ENV_AUDIT_CSV: &str = "BARKY_AUDIT_CSV";
pub const ENV_BROADCAST_TOPIC: &str = "BARKY_BROADCAST_TOPIC";
pub const ENV_LOG_LEVEL: &str = "BARKY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BARKY_LOG_DIR";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarkyConfig {
    pub db_path: PathBuf,
    /// Process-relative unless an absolute path is configured.
    pub audit_csv_path: PathBuf,
    pub broadcast_topic: String,
    pub log_level: String,
    /// Logs go to stderr while `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for BarkyConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            audit_csv_path: PathBuf::from(DEFAULT_AUDIT_CSV_FILE_NAME),
            broadcast_topic: DEFAULT_BROADCAST_TOPIC.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl BarkyConfig {
    /// Defaults overlaid with process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`; used by `from_env` and tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(path) = value(ENV_AUDIT_CSV) {
            config.audit_csv_path = PathBuf::from(path);
        }
        if let Some(topic) = value(ENV_BROADCAST_TOPIC) {
            config.broadcast_topic = topic;
        }
        if let Some(level) = value(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = value(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_topic(&self.broadcast_topic).map_err(ConfigError::InvalidTopic)
    }
}

/// Configuration resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidTopic(PublishError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTopic(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTopic(err) => Some(err),
        }
    }
}
