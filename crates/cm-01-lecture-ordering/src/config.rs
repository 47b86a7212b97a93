//! Configuration for Lecture Ordering

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ordering engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderingConfig {
    /// Upper bound for a single Item Store call
    pub store_timeout_ms: u64,
    /// Upper bound for acquiring the section (or course) locks of one operation
    pub lock_timeout_ms: u64,
    /// Serialize writers per section. Disabling reproduces the unguarded
    /// interleaving where two moves can corrupt a section.
    pub serialize_writes: bool,
    /// Appends beyond this many lectures per section are rejected
    pub max_lectures_per_section: u32,
    /// Journal multi-step operations for later reconciliation
    pub journal_enabled: bool,
}

impl OrderingConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 5_000,
            lock_timeout_ms: 10_000,
            serialize_writes: true,
            max_lectures_per_section: 1_000,
            journal_enabled: true,
        }
    }
}
