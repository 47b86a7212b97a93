//! # Shared Types Crate
//!
//! This crate contains the curriculum entities shared by the ordering engine
//! (cm-01) and the curriculum service (cm-02).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Course, section and lecture records are
//!   defined once and reused by every subsystem and store adapter.
//! - **Typed Identifiers**: every record is keyed by its own UUID newtype so
//!   a section id can never be passed where a lecture id is expected.
//! - **Position Ownership**: a lecture's `order` is only ever written by the
//!   ordering engine; everything else treats it as read-only.

pub mod entities;

pub use entities::*;
