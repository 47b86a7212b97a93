//! Cross-crate integration tests.

pub mod concurrency;
pub mod crash_recovery;
pub mod ordering_flows;
