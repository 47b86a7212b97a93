//! In-Memory Item Store
//!
//! Implements the `ItemStore` port over two hash maps. Each call takes its
//! own lock, so like the production store a range shift and the following
//! positional write are separate, interleavable steps.

use crate::domain::errors::StoreError;
use crate::domain::value_objects::{LectureUpdate, Placement, RangeShift};
use crate::ports::outbound::ItemStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{CourseId, Lecture, LectureId, LectureStatus, Section, SectionId};
use std::collections::HashMap;
use tracing::trace;

/// In-memory item store for tests and embedded use.
#[derive(Default)]
pub struct InMemoryItemStore {
    lectures: RwLock<HashMap<LectureId, Lecture>>,
    sections: RwLock<HashMap<SectionId, Section>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored lecture (any section), for invariant checks in tests.
    pub fn all_lectures(&self) -> Vec<Lecture> {
        self.lectures.read().values().cloned().collect()
    }

    /// Overwrite a lecture's order directly, bypassing the engine.
    ///
    /// Only for simulating damage left by an interrupted operation.
    pub fn force_order(&self, lecture_id: LectureId, order: u32) -> bool {
        match self.lectures.write().get_mut(&lecture_id) {
            Some(lecture) => {
                lecture.order = order;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn get_lecture(&self, lecture_id: LectureId) -> Result<Option<Lecture>, StoreError> {
        Ok(self.lectures.read().get(&lecture_id).cloned())
    }

    async fn get_section(&self, section_id: SectionId) -> Result<Option<Section>, StoreError> {
        Ok(self.sections.read().get(&section_id).cloned())
    }

    async fn count_lectures(&self, section_id: SectionId) -> Result<u32, StoreError> {
        let count = self
            .lectures
            .read()
            .values()
            .filter(|l| l.section_id == section_id)
            .count();
        Ok(count as u32)
    }

    async fn list_lectures(&self, section_id: SectionId) -> Result<Vec<Lecture>, StoreError> {
        Ok(self
            .lectures
            .read()
            .values()
            .filter(|l| l.section_id == section_id)
            .cloned()
            .collect())
    }

    async fn shift_range(&self, shift: &RangeShift) -> Result<u64, StoreError> {
        let mut lectures = self.lectures.write();
        let mut matched = 0u64;
        for lecture in lectures.values_mut() {
            if let Some(order) = shift.shifted(lecture.section_id, lecture.order) {
                lecture.order = order;
                matched += 1;
            }
        }
        trace!(
            section_id = %shift.section_id,
            range = %shift.range,
            delta = shift.delta,
            matched,
            "[cm-01] memory shift_range"
        );
        Ok(matched)
    }

    async fn set_position(&self, placement: &Placement) -> Result<Option<Lecture>, StoreError> {
        let mut lectures = self.lectures.write();
        Ok(lectures.get_mut(&placement.lecture_id).map(|lecture| {
            lecture.section_id = placement.section_id;
            lecture.order = placement.order;
            lecture.clone()
        }))
    }

    async fn insert_lecture(&self, lecture: &Lecture) -> Result<(), StoreError> {
        let mut lectures = self.lectures.write();
        if lectures.contains_key(&lecture.id) {
            return Err(StoreError::Duplicate(lecture.id.to_string()));
        }
        lectures.insert(lecture.id, lecture.clone());
        Ok(())
    }

    async fn delete_lecture(&self, lecture_id: LectureId) -> Result<Option<Lecture>, StoreError> {
        Ok(self.lectures.write().remove(&lecture_id))
    }

    async fn update_lecture(
        &self,
        lecture_id: LectureId,
        update: &LectureUpdate,
    ) -> Result<Option<Lecture>, StoreError> {
        let mut lectures = self.lectures.write();
        let Some(lecture) = lectures.get_mut(&lecture_id) else {
            return Ok(None);
        };
        apply_update(lecture, update);
        Ok(Some(lecture.clone()))
    }

    async fn insert_section(&self, section: &Section) -> Result<(), StoreError> {
        let mut sections = self.sections.write();
        if sections.contains_key(&section.id) {
            return Err(StoreError::Duplicate(section.id.to_string()));
        }
        sections.insert(section.id, section.clone());
        Ok(())
    }

    async fn list_sections(&self, course_id: CourseId) -> Result<Vec<Section>, StoreError> {
        Ok(self
            .sections
            .read()
            .values()
            .filter(|s| s.course_id == course_id)
            .cloned()
            .collect())
    }
}

/// Apply a non-positional update to a lecture document.
pub(crate) fn apply_update(lecture: &mut Lecture, update: &LectureUpdate) {
    match update {
        LectureUpdate::Details(data) => {
            lecture.title = data.title.clone();
            lecture.media_ref = data.media_ref.clone();
            lecture.duration_secs = data.duration_secs;
        }
        LectureUpdate::Processed { media_ref } => {
            lecture.media_ref = media_ref.clone();
            lecture.status = LectureStatus::Processed;
        }
    }
}
