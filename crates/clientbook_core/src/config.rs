//! Store connection configuration.
//!
//! # Responsibility
//! - Describe where the database lives and how its session is tuned.
//! - Load those settings from `CLIENTBOOK_*` environment variables.
//!
//! # Invariants
//! - `db_path = None` always means a private in-memory database.
//! - The effective statement cache never drops below the number of
//!   repository statements.

use crate::repo::client_repo::STATEMENT_COUNT;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Prefix shared by every environment variable read by [`StoreConfig::from_env`].
pub const ENV_PREFIX: &str = "CLIENTBOOK_";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_STATEMENT_CACHE_CAPACITY: usize = 16;

#[derive(Debug)]
pub enum ConfigError {
    Env(envy::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env(err) => write!(f, "invalid {ENV_PREFIX}* environment: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Env(err) => Some(err),
        }
    }
}

impl From<envy::Error> for ConfigError {
    fn from(value: envy::Error) -> Self {
        Self::Env(value)
    }
}

/// Connection settings for a client store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file. `None` opens an in-memory database.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// How long a statement waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Prepared statement cache size for the connection.
    #[serde(default = "default_statement_cache_capacity")]
    pub statement_cache_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            statement_cache_capacity: DEFAULT_STATEMENT_CACHE_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Default settings pointed at a database file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Reads `CLIENTBOOK_DB_PATH`, `CLIENTBOOK_BUSY_TIMEOUT_MS` and
    /// `CLIENTBOOK_STATEMENT_CACHE_CAPACITY` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Same as [`StoreConfig::from_env`] over an explicit variable set.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }

    /// Database file path, if any.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Cache capacity actually applied to the connection.
    pub fn effective_statement_cache_capacity(&self) -> usize {
        self.statement_cache_capacity.max(STATEMENT_COUNT)
    }
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_statement_cache_capacity() -> usize {
    DEFAULT_STATEMENT_CACHE_CAPACITY
}
