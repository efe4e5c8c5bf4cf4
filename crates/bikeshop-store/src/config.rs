//! Store configuration
//!
//! A `StoreConfig` is built in code, read from a TOML file, or read from
//! the environment, then handed to `SqliteStore::open`. There is no global
//! connection; every store owns the connection its config describes.
//!
//! ```toml
//! path = "bikeshop.db"
//! busy_timeout_ms = 5000
//! delete_policy = "cascade"
//! ```

use std::path::{Path, PathBuf};

use bikeshop_core::errors::{ExError, ExErrorKind};
use bikeshop_core::policy::DeletePolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Database file path
pub const ENV_DB_PATH: &str = "BIKESHOP_DB_PATH";
/// `restrict` or `cascade`
pub const ENV_DELETE_POLICY: &str = "BIKESHOP_DELETE_POLICY";
pub const ENV_BUSY_TIMEOUT_MS: &str = "BIKESHOP_BUSY_TIMEOUT_MS";

/// Path meaning "no file, keep everything in memory"
pub const IN_MEMORY: &str = ":memory:";

const DEFAULT_DB_PATH: &str = "bikeshop.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Configuration loading failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(String),

    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidVar {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<ConfigError> for ExError {
    fn from(err: ConfigError) -> Self {
        ExError::new(ExErrorKind::Config)
            .with_op("config")
            .with_message(err.to_string())
    }
}

/// Connection settings for one SQLite store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file, or `:memory:`
    pub path: PathBuf,

    /// How long a statement waits on a locked database
    pub busy_timeout_ms: u64,

    pub delete_policy: DeletePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            delete_policy: DeletePolicy::default(),
        }
    }
}

impl StoreConfig {
    /// File-backed store at `path` with default settings
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// In-memory store, gone when the store is dropped
    pub fn in_memory() -> Self {
        Self::at_path(IN_MEMORY)
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY
    }

    /// Parse a TOML document; absent keys keep their defaults
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed TOML or unknown policy names.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` when the file cannot be read, `ConfigError::Parse`
    /// when it is not valid.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults overridden by `BIKESHOP_*` variables, honoring a `.env` file
    ///
    /// # Errors
    /// `ConfigError::InvalidVar` for a variable that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply `BIKESHOP_*` overrides found through `lookup`
    ///
    /// # Errors
    /// `ConfigError::InvalidVar` for a value that does not parse.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            self.path = PathBuf::from(path.trim());
        }

        if let Some(value) = lookup(ENV_DELETE_POLICY) {
            self.delete_policy = value.parse().map_err(|e: ExError| ConfigError::InvalidVar {
                name: ENV_DELETE_POLICY.to_string(),
                value: value.clone(),
                reason: e.message().to_string(),
            })?;
        }

        if let Some(value) = lookup(ENV_BUSY_TIMEOUT_MS) {
            self.busy_timeout_ms =
                value
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidVar {
                        name: ENV_BUSY_TIMEOUT_MS.to_string(),
                        value: value.clone(),
                        reason: e.to_string(),
                    })?;
        }

        Ok(self)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    /// As [`StoreConfig::with_overrides`].
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        self.with_overrides(|name| std::env::var(name).ok())
    }
}
