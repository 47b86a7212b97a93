//! Outbound Ports (Driven Ports / SPI)
//!
//! What the engine needs from its host: an Item Store without multi-document
//! transactions, a journal for in-flight operations, and the raw key-value
//! backend the persistent adapters are built on.

use crate::domain::entities::JournalRecord;
use crate::domain::errors::{KVStoreError, StoreError};
use crate::domain::value_objects::{JournalId, LectureUpdate, Placement, RangeShift};
use async_trait::async_trait;
use shared_types::{CourseId, Lecture, LectureId, Section, SectionId};

/// Persistent collection of section and lecture records.
///
/// Every method is one independent store call. Nothing spans two calls:
/// a range shift followed by a positional write can be observed, or
/// interrupted, in between.
///
/// Production: `KvItemStore` over `FileBackedKVStore`
/// Testing: `InMemoryItemStore`
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Point lookup of a lecture.
    async fn get_lecture(&self, lecture_id: LectureId) -> Result<Option<Lecture>, StoreError>;

    /// Point lookup of a section.
    async fn get_section(&self, section_id: SectionId) -> Result<Option<Section>, StoreError>;

    /// Number of lectures whose parent is `section_id`.
    async fn count_lectures(&self, section_id: SectionId) -> Result<u32, StoreError>;

    /// All lectures of a section, in no particular order.
    async fn list_lectures(&self, section_id: SectionId) -> Result<Vec<Lecture>, StoreError>;

    /// Range update: add `shift.delta` to `order` of every lecture matching
    /// `(shift.section_id, shift.range)`. Returns the number matched.
    async fn shift_range(&self, shift: &RangeShift) -> Result<u64, StoreError>;

    /// Single-document write of section and order. `None` if the lecture is
    /// gone.
    async fn set_position(&self, placement: &Placement) -> Result<Option<Lecture>, StoreError>;

    /// Apply several positional writes, returning how many lectures were
    /// found. Backends that can write them in one batch override this.
    async fn set_positions(&self, placements: &[Placement]) -> Result<u64, StoreError> {
        let mut placed = 0;
        for placement in placements {
            if self.set_position(placement).await?.is_some() {
                placed += 1;
            }
        }
        Ok(placed)
    }

    /// Insert a new lecture document.
    async fn insert_lecture(&self, lecture: &Lecture) -> Result<(), StoreError>;

    /// Delete a lecture document, returning it if it existed.
    async fn delete_lecture(&self, lecture_id: LectureId) -> Result<Option<Lecture>, StoreError>;

    /// Single-document update that never touches `order` or `section_id`.
    async fn update_lecture(
        &self,
        lecture_id: LectureId,
        update: &LectureUpdate,
    ) -> Result<Option<Lecture>, StoreError>;

    /// Insert a new section document.
    async fn insert_section(&self, section: &Section) -> Result<(), StoreError>;

    /// All sections of a course, in no particular order.
    async fn list_sections(&self, course_id: CourseId) -> Result<Vec<Section>, StoreError>;
}

/// Step log for multi-step operations.
///
/// A record is opened before the first write and closed after the last. The
/// reconciliation pass treats every record still present as a section that
/// may hold a partial shift.
#[async_trait]
pub trait MoveJournal: Send + Sync {
    /// Persist a freshly opened record.
    async fn open(&self, record: &JournalRecord) -> Result<(), StoreError>;

    /// Advance the applied-step counter.
    async fn mark_applied(&self, id: JournalId, applied: usize) -> Result<(), StoreError>;

    /// Attach the error that aborted the operation.
    async fn mark_failed(&self, id: JournalId, failure: &str) -> Result<(), StoreError>;

    /// Remove a record (operation completed or repaired).
    async fn close(&self, id: JournalId) -> Result<(), StoreError>;

    /// Fetch one record.
    async fn get(&self, id: JournalId) -> Result<Option<JournalRecord>, StoreError>;

    /// Every record not yet closed.
    async fn pending(&self) -> Result<Vec<JournalRecord>, StoreError>;
}

/// Abstract interface for key-value database operations.
///
/// Production: `FileBackedKVStore`
/// Testing: `InMemoryKVStore`
pub trait KeyValueStore: Send + Sync + 'static {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch succeed, or NONE are applied.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Iterate over keys with a prefix.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;
}

/// Key-value pairs returned by a prefix scan.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Batch operation for atomic writes.
#[derive(Debug, Clone)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}
