//! # Curriculum Telemetry
//!
//! Structured logging for the curriculum services, built on `tracing` and
//! `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use curriculum_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CM_SERVICE_NAME` | `curriculum` | Service name on the startup event |
//! | `CM_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `CM_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

/// Telemetry errors
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
