//! Error types for Lecture Ordering
//!
//! Three families reach the caller: validation failures (rejected before any
//! write), missing records, and store failures (propagated verbatim, never
//! compensated).

use shared_types::{LectureId, SectionId};
use thiserror::Error;

/// All errors that can occur in lecture ordering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    /// Request rejected before any store write
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced section does not exist
    #[error("Section not found: {0}")]
    SectionNotFound(SectionId),

    /// Referenced lecture does not exist
    #[error("Lecture not found: {0}")]
    LectureNotFound(LectureId),

    /// Item Store call failed; earlier steps of the same operation stay applied
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Per-section lock could not be acquired in time
    #[error("Timed out after {timeout_ms}ms waiting for lock on {resource}")]
    LockTimeout { resource: String, timeout_ms: u64 },
}

impl OrderingError {
    /// True when no store write was issued before the error surfaced.
    pub fn is_side_effect_free(&self) -> bool {
        !matches!(self, OrderingError::Store(_))
    }
}

/// Malformed or inconsistent move/insert requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Position must be a non-negative integer, got {0}")]
    InvalidPosition(String),

    #[error("Source and target positions are both {0}")]
    SamePosition(u32),

    #[error("Source and target sections are the same: {0}")]
    SameSection(SectionId),

    #[error("Sections {from} and {to} belong to different courses")]
    CrossCourseMove { from: SectionId, to: SectionId },

    #[error("Position {position} out of range for section {section_id} with {count} lectures")]
    OutOfRange {
        section_id: SectionId,
        position: u32,
        count: u32,
    },

    #[error("Lecture {lecture_id} is not at position {expected} of section {section_id}")]
    StalePosition {
        lecture_id: LectureId,
        section_id: SectionId,
        expected: u32,
    },

    #[error("Section {section_id} is full: {max} lectures")]
    SectionFull { section_id: SectionId, max: u32 },

    #[error("Invalid lecture data: {0}")]
    InvalidLectureData(String),

    #[error("Invalid section data: {0}")]
    InvalidSectionData(String),
}

/// Item Store failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Backend failure: {0}")]
    Backend(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Document already exists: {0}")]
    Duplicate(String),

    #[error("Store call {operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },
}

/// Key-value backend failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    #[error("I/O error: {message}")]
    IOError { message: String },

    #[error("Corrupt record under key {key}")]
    Corrupt { key: String },
}

impl From<KVStoreError> for StoreError {
    fn from(err: KVStoreError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
