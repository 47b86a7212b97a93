//! Value objects for the Curriculum Service

use cm_01_lecture_ordering::Position;
use shared_types::{CourseId, LectureId, SectionId};

/// A drag-and-drop request after payload validation.
///
/// `from_section == to_section` is a reorder within one section; anything
/// else moves the lecture to another section of the same course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveLectureCommand {
    pub course_id: CourseId,
    pub lecture_id: LectureId,
    pub from_section: SectionId,
    pub to_section: SectionId,
    pub from: Position,
    pub to: Position,
}

impl MoveLectureCommand {
    pub fn is_within_section(&self) -> bool {
        self.from_section == self.to_section
    }
}
