//! Client-state configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `POCKETSHOP_DATA_DIR` - Directory for the file-backed store (default: `.pocketshop`)
//! - `POCKETSHOP_SCAN_HISTORY_LIMIT` - Maximum scan history entries (default: 50)

use std::path::PathBuf;

use thiserror::Error;

use crate::scan_history::DEFAULT_SCAN_HISTORY_LIMIT;

const DEFAULT_DATA_DIR: &str = ".pocketshop";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client-state configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientStateConfig {
    /// Root directory for the file-backed store
    pub data_dir: PathBuf,
    /// Maximum number of scan history entries kept
    pub scan_history_limit: usize,
}

impl Default for ClientStateConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            scan_history_limit: DEFAULT_SCAN_HISTORY_LIMIT,
        }
    }
}

impl ClientStateConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("POCKETSHOP_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or(defaults.data_dir, PathBuf::from);

        let scan_history_limit = match lookup("POCKETSHOP_SCAN_HISTORY_LIMIT") {
            None => defaults.scan_history_limit,
            Some(raw) => parse_limit(&raw)?,
        };

        Ok(Self {
            data_dir,
            scan_history_limit,
        })
    }
}

fn parse_limit(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::InvalidEnvVar(
            "POCKETSHOP_SCAN_HISTORY_LIMIT".to_string(),
            format!("{reason}: {raw}"),
        )
    };

    let limit: usize = raw
        .trim()
        .parse()
        .map_err(|_| invalid("must be a positive integer"))?;
    if limit == 0 {
        return Err(invalid("must be at least 1"));
    }
    Ok(limit)
}
