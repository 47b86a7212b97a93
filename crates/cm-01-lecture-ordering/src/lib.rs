//! # CM-01: Lecture Ordering Engine
//!
//! Keeps the `order` numbering of lectures inside each section contiguous
//! (`0..N`, no gaps, no duplicates) on an Item Store that offers range
//! updates and single-document writes but no multi-document transactions.
//!
//! ## Architecture
//!
//! - **Domain**: move requests, plans, journal records, the ordering invariant
//! - **Algorithms**: shift planning (single-hole shift) and stable renumbering
//! - **Ports**: Inbound (`LectureOrderingApi`) and Outbound (`ItemStore`,
//!   `MoveJournal`, `KeyValueStore`)
//! - **Adapters**: in-memory and file-backed stores, journal, keyed locks
//! - **Application**: service orchestration (locks, timeouts, journaling)
//!
//! ## Consistency model
//!
//! Every operation is 1-3 independent store writes. Writers on the same
//! section are serialized by a per-section async lock; a cross-section move
//! takes both locks in ascending id order. A failed step aborts the
//! operation without rollback and leaves a journal record behind, which
//! `reconcile_pending` later uses to renumber the affected sections.

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

/// Fixtures and store wrappers for tests.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{
    FileBackedKVStore, InMemoryItemStore, InMemoryKVStore, KeyedLocks, KvItemStore, KvMoveJournal,
};
pub use application::LectureOrderingService;
pub use config::OrderingConfig;
pub use domain::entities::*;
pub use domain::errors::{KVStoreError, OrderingError, StoreError, ValidationError};
pub use domain::invariants::{
    find_order_violation, invariant_contiguous_order, invariant_listed_sequence,
};
pub use domain::value_objects::*;
pub use ports::inbound::LectureOrderingApi;
pub use ports::outbound::{BatchOperation, ItemStore, KeyValueStore, MoveJournal, ScanResult};
