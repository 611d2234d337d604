//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Resolve database location and logging options from the environment.
//!
//! # Invariants
//! - Missing variables fall back to defaults; blank values count as missing.
//! - Loading configuration has no side effects beyond reading variables.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "PESCA_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "PESCA_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "PESCA_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "pesca.sqlite3";

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding competition records.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory; file logging stays off when `None`.
    pub log_dir: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `PESCA_DB_PATH`, `PESCA_LOG_LEVEL` and `PESCA_LOG_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: value(DB_PATH_VAR).map_or(defaults.db_path, PathBuf::from),
            log_level: value(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
            log_dir: value(LOG_DIR_VAR),
        }
    }
}
