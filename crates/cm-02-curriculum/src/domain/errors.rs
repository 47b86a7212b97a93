//! Error types for the Curriculum Service

use cm_01_lecture_ordering::{OrderingError, ValidationError};
use shared_types::{CourseId, InstructorId, LectureId, SectionId};
use thiserror::Error;

/// All errors that can occur at the curriculum boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurriculumError {
    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    #[error("Instructor {instructor_id} does not own course {course_id}")]
    NotCourseOwner {
        course_id: CourseId,
        instructor_id: InstructorId,
    },

    #[error("Section {section_id} does not belong to course {course_id}")]
    SectionNotInCourse {
        section_id: SectionId,
        course_id: CourseId,
    },

    #[error("Lecture {lecture_id} does not belong to course {course_id}")]
    LectureNotInCourse {
        lecture_id: LectureId,
        course_id: CourseId,
    },

    #[error("Lecture {lecture_id} is not in section {section_id}")]
    LectureNotInSection {
        lecture_id: LectureId,
        section_id: SectionId,
    },

    /// Malformed payload field (bad id, non-integer position, missing text)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Course directory lookup failed
    #[error("Course directory error: {0}")]
    Directory(String),

    #[error(transparent)]
    Ordering(#[from] OrderingError),
}

impl From<ValidationError> for CurriculumError {
    fn from(err: ValidationError) -> Self {
        CurriculumError::Ordering(OrderingError::Validation(err))
    }
}

impl CurriculumError {
    /// Stable machine-readable error code for responses.
    pub fn code(&self) -> &'static str {
        match self {
            CurriculumError::CourseNotFound(_) => "not_found",
            CurriculumError::NotCourseOwner { .. } => "forbidden",
            CurriculumError::SectionNotInCourse { .. }
            | CurriculumError::LectureNotInCourse { .. }
            | CurriculumError::LectureNotInSection { .. }
            | CurriculumError::InvalidRequest(_) => "bad_request",
            CurriculumError::Directory(_) => "unavailable",
            CurriculumError::Ordering(err) => match err {
                OrderingError::Validation(_) => "bad_request",
                OrderingError::SectionNotFound(_) | OrderingError::LectureNotFound(_) => {
                    "not_found"
                }
                OrderingError::LockTimeout { .. } => "busy",
                OrderingError::Store(_) => "store_error",
            },
        }
    }
}
