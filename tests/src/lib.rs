//! # Curriculum Ordering Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── ordering_benchmarks.rs   # criterion: moves, appends, reconcile
//! └── src/integration/
//!     ├── ordering_flows.rs        # handler → service → engine → file store
//!     ├── concurrency.rs           # interleaved moves with and without locks
//!     └── crash_recovery.rs        # partial failures and journal replay
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cm-tests
//!
//! # By category
//! cargo test -p cm-tests integration::concurrency::
//!
//! # Benchmarks
//! cargo bench -p cm-tests
//! ```

pub mod integration;
