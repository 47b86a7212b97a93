//! # Runtime Configuration
//!
//! Defaults suit a local development run; every field can be overridden
//! from the environment.

use cm_01_lecture_ordering::OrderingConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Directory holding `items.db`, `journal.db` and the `LOCK` file.
    pub data_dir: PathBuf,
    /// Period of the journal sweep.
    pub reconcile_interval: Duration,
    /// Engine settings.
    pub ordering: OrderingConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            reconcile_interval: Duration::from_secs(60),
            ordering: OrderingConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("data directory path is empty")]
    EmptyDataDir,
}

impl RuntimeConfig {
    /// Load configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `CM_DATA_DIR`: data directory (default: ./data)
    /// - `CM_RECONCILE_INTERVAL_SECS`: journal sweep period (default: 60)
    /// - `CM_STORE_TIMEOUT_MS`: per store call timeout (default: 5000)
    /// - `CM_LOCK_TIMEOUT_MS`: section lock timeout (default: 10000)
    ///
    /// Unparsable numbers are reported and the default is kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("CM_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
            info!(data_dir = %config.data_dir.display(), "Loaded data directory from environment");
        }
        if let Some(secs) = parse_number(&lookup, "CM_RECONCILE_INTERVAL_SECS") {
            config.reconcile_interval = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_number(&lookup, "CM_STORE_TIMEOUT_MS") {
            config.ordering.store_timeout_ms = ms;
        }
        if let Some(ms) = parse_number(&lookup, "CM_LOCK_TIMEOUT_MS") {
            config.ordering.lock_timeout_ms = ms;
        }

        config
    }

    /// Reject settings the runtime cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        if self.reconcile_interval.is_zero() {
            return Err(ConfigError::Zero {
                field: "CM_RECONCILE_INTERVAL_SECS",
            });
        }
        if self.ordering.store_timeout_ms == 0 {
            return Err(ConfigError::Zero {
                field: "CM_STORE_TIMEOUT_MS",
            });
        }
        if self.ordering.lock_timeout_ms == 0 {
            return Err(ConfigError::Zero {
                field: "CM_LOCK_TIMEOUT_MS",
            });
        }
        Ok(())
    }
}

fn parse_number(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable setting");
            None
        }
    }
}
