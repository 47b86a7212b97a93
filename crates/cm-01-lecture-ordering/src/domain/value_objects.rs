//! Value objects for Lecture Ordering
//!
//! Move requests are validated into these types before the engine touches
//! the store, so order arithmetic never sees a negative or non-integer
//! position.

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};
use shared_types::{LectureData, LectureId, SectionId};
use std::fmt;
use uuid::Uuid;

/// Zero-based position of a lecture within its section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position(u32);

impl Position {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Position {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Position)
            .map_err(|_| ValidationError::InvalidPosition(value.to_string()))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Drag of a lecture to another slot in the same section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithinSectionMove {
    pub section_id: SectionId,
    pub lecture_id: LectureId,
    pub from: Position,
    pub to: Position,
}

impl WithinSectionMove {
    /// Rejects no-op moves (`from == to`).
    pub fn new(
        section_id: SectionId,
        lecture_id: LectureId,
        from: Position,
        to: Position,
    ) -> Result<Self, ValidationError> {
        if from == to {
            return Err(ValidationError::SamePosition(from.get()));
        }
        Ok(Self {
            section_id,
            lecture_id,
            from,
            to,
        })
    }
}

/// Drag of a lecture into a different section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossSectionMove {
    pub lecture_id: LectureId,
    pub from_section: SectionId,
    pub to_section: SectionId,
    pub from: Position,
    pub to: Position,
}

impl CrossSectionMove {
    /// Rejects moves whose source and destination are the same section.
    pub fn new(
        lecture_id: LectureId,
        from_section: SectionId,
        to_section: SectionId,
        from: Position,
        to: Position,
    ) -> Result<Self, ValidationError> {
        if from_section == to_section {
            return Err(ValidationError::SameSection(from_section));
        }
        Ok(Self {
            lecture_id,
            from_section,
            to_section,
            from,
            to,
        })
    }
}

/// Inclusive order interval used as a range-shift predicate.
///
/// `max == None` means unbounded above.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl OrderRange {
    /// `[min, max]`
    pub fn between(min: u32, max: u32) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// `[min, ∞)`
    pub fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, order: u32) -> bool {
        order >= self.min && self.max.map_or(true, |max| order <= max)
    }
}

impl fmt::Display for OrderRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "[{}, {}]", self.min, max),
            None => write!(f, "[{}, ∞)", self.min),
        }
    }
}

/// One range-shift update: every lecture of `section_id` whose order lies in
/// `range` moves by `delta`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeShift {
    pub section_id: SectionId,
    pub range: OrderRange,
    pub delta: i32,
}

impl RangeShift {
    /// Apply this shift to a single order value if it matches.
    pub fn shifted(&self, section_id: SectionId, order: u32) -> Option<u32> {
        if section_id != self.section_id || !self.range.contains(order) {
            return None;
        }
        Some(order.saturating_add_signed(self.delta))
    }
}

/// Final positional write of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub lecture_id: LectureId,
    pub section_id: SectionId,
    pub order: u32,
}

/// Non-positional single-document lecture update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LectureUpdate {
    /// Replace title, media reference and duration.
    Details(LectureData),
    /// Transcoding finished: media now lives under `media_ref`.
    Processed { media_ref: String },
}

/// Journal record identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JournalId(pub Uuid);

impl JournalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JournalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JournalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate caller-supplied lecture attributes.
pub fn validate_lecture_data(data: &LectureData) -> Result<(), ValidationError> {
    if data.title.trim().is_empty() {
        return Err(ValidationError::InvalidLectureData(
            "title must not be empty".to_string(),
        ));
    }
    if data.media_ref.trim().is_empty() {
        return Err(ValidationError::InvalidLectureData(
            "media reference must not be empty".to_string(),
        ));
    }
    if data.duration_secs == 0 {
        return Err(ValidationError::InvalidLectureData(
            "duration must be positive".to_string(),
        ));
    }
    Ok(())
}
