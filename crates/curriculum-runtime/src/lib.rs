//! # Curriculum Runtime
//!
//! Wires the ordering engine to durable file-backed stores for a single
//! data directory and keeps the move journal drained.
//!
//! ## Modules
//!
//! - `config/` - environment driven `RuntimeConfig`
//! - `lock/` - exclusive `DataDirLock` on the data directory
//! - `runtime/` - store wiring, startup recovery and the journal sweep

pub mod config;
pub mod lock;
pub mod runtime;

pub use config::{ConfigError, RuntimeConfig};
pub use lock::{DataDirLock, LockError};
pub use runtime::{CurriculumRuntime, DurableOrderingService};
