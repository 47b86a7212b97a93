//! # Core Domain Entities
//!
//! Defines the curriculum records: a course owns sections, a section owns
//! lectures.
//!
//! ## Clusters
//!
//! - **Identity**: `CourseId`, `SectionId`, `LectureId`, `InstructorId`
//! - **Hierarchy**: `Course`, `Section`, `Lecture`
//! - **Inputs**: `LectureData`, `SectionData`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID-backed identifier newtype.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Raw 16-byte representation (used for storage keys).
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier of a course.
    CourseId
);
uuid_id!(
    /// Unique identifier of a section within a course.
    SectionId
);
uuid_id!(
    /// Unique identifier of a lecture.
    LectureId
);
uuid_id!(
    /// Unique identifier of an instructor account.
    InstructorId
);

// =============================================================================
// HIERARCHY
// =============================================================================

/// A course owned by exactly one instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// The only account allowed to change this course's curriculum.
    pub instructor_id: InstructorId,
    pub title: String,
}

/// A named grouping of lectures within a course.
///
/// Sections are ordered by creation; `order` is assigned on append and never
/// rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    /// Zero-based creation position within the course.
    pub order: u32,
}

/// Processing state of a lecture's media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LectureStatus {
    /// Uploaded, waiting for the transcoding pipeline.
    #[default]
    Pending,
    /// Transcoded media is available under `media_ref`.
    Processed,
}

impl fmt::Display for LectureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LectureStatus::Pending => write!(f, "pending"),
            LectureStatus::Processed => write!(f, "processed"),
        }
    }
}

/// A single content item inside a section.
///
/// For a section with N lectures the `order` values are exactly `0..N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: LectureId,
    pub course_id: CourseId,
    pub section_id: SectionId,
    /// Zero-based position within `section_id`.
    pub order: u32,
    pub title: String,
    /// Storage key of the uploaded (or processed) media.
    pub media_ref: String,
    pub duration_secs: u32,
    pub status: LectureStatus,
}

impl Lecture {
    /// Build a pending lecture at the given position.
    pub fn new(course_id: CourseId, section_id: SectionId, order: u32, data: LectureData) -> Self {
        Self {
            id: LectureId::new(),
            course_id,
            section_id,
            order,
            title: data.title,
            media_ref: data.media_ref,
            duration_secs: data.duration_secs,
            status: LectureStatus::Pending,
        }
    }
}

// =============================================================================
// INPUTS
// =============================================================================

/// Caller-supplied lecture attributes (create and edit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureData {
    pub title: String,
    pub media_ref: String,
    pub duration_secs: u32,
}

/// Caller-supplied section attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionData {
    pub title: String,
    pub description: String,
}
