//! Ports module for Lecture Ordering
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::LectureOrderingApi;
pub use outbound::{BatchOperation, ItemStore, KeyValueStore, MoveJournal, ScanResult};
