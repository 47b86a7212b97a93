//! Inbound Ports (Driving Ports / API)
//!
//! The call contract consumed by the curriculum service. Callers are
//! trusted: course ownership is checked before any of these is invoked.

use crate::domain::entities::ReconcileReport;
use crate::domain::errors::OrderingError;
use crate::domain::value_objects::{CrossSectionMove, WithinSectionMove};
use async_trait::async_trait;
use shared_types::{CourseId, Lecture, LectureData, LectureId, Section, SectionData, SectionId};

/// Primary Lecture Ordering API
#[async_trait]
pub trait LectureOrderingApi: Send + Sync {
    /// Reorder a lecture inside its section.
    ///
    /// Issues one range shift, then one positional write. Returns the
    /// updated lecture.
    async fn move_within_section(&self, mv: WithinSectionMove) -> Result<Lecture, OrderingError>;

    /// Move a lecture into another section of the same course.
    ///
    /// Source compaction, then destination expansion, then reassignment.
    async fn move_across_sections(&self, mv: CrossSectionMove) -> Result<Lecture, OrderingError>;

    /// Create a lecture at the tail of a section.
    async fn append_lecture(
        &self,
        section_id: SectionId,
        data: LectureData,
    ) -> Result<Lecture, OrderingError>;

    /// Lectures of a section sorted by ascending order.
    ///
    /// Not synchronized with writers: a reader may observe a mid-move
    /// numbering.
    async fn list_ordered(&self, section_id: SectionId) -> Result<Vec<Lecture>, OrderingError>;

    /// Delete a lecture and close the gap it leaves.
    async fn remove_lecture(&self, lecture_id: LectureId) -> Result<Lecture, OrderingError>;

    /// Point read of a lecture.
    async fn get_lecture(&self, lecture_id: LectureId) -> Result<Lecture, OrderingError>;

    /// Replace title, media reference and duration. Position is untouched.
    async fn update_lecture_details(
        &self,
        lecture_id: LectureId,
        data: LectureData,
    ) -> Result<Lecture, OrderingError>;

    /// Record that transcoding finished and the media lives under `media_ref`.
    async fn mark_processed(
        &self,
        lecture_id: LectureId,
        media_ref: String,
    ) -> Result<Lecture, OrderingError>;

    /// Create a section at the end of a course.
    async fn append_section(
        &self,
        course_id: CourseId,
        data: SectionData,
    ) -> Result<Section, OrderingError>;

    /// Point read of a section.
    async fn get_section(&self, section_id: SectionId) -> Result<Section, OrderingError>;

    /// Sections of a course in creation order.
    async fn list_sections(&self, course_id: CourseId) -> Result<Vec<Section>, OrderingError>;

    /// Detect and repair gaps or duplicates in one section.
    async fn reconcile_section(&self, section_id: SectionId)
        -> Result<ReconcileReport, OrderingError>;

    /// Repair every section touched by an operation that never completed.
    ///
    /// A record that cannot be repaired now (lock timeout, store error) is
    /// logged and left pending for the next pass. Only a failure to read
    /// the journal itself is returned as an error.
    async fn reconcile_pending(&self) -> Result<Vec<ReconcileReport>, OrderingError>;
}
