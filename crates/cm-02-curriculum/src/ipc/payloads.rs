//! IPC Payloads for the Curriculum Service
//!
//! Identifiers arrive as strings and positions as arbitrary JSON values; the
//! `parse_*` helpers turn them into validated keys before any service
//! call. Caller identity is NOT part of these payloads (it comes from the
//! authenticated session) except for the transcoding callback, which names
//! the course owner explicitly.

use crate::domain::errors::CurriculumError;
use crate::domain::value_objects::MoveLectureCommand;
use cm_01_lecture_ordering::Position;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{CourseId, InstructorId, LectureData, LectureId, SectionData, SectionId};
use std::str::FromStr;

// ============================================================
// INCOMING REQUESTS
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPayload {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturePayload {
    pub title: String,
    /// Upload key of the raw video
    pub video_url: String,
    /// Seconds
    pub duration: u32,
}

impl From<SectionPayload> for SectionData {
    fn from(payload: SectionPayload) -> Self {
        SectionData {
            title: payload.title,
            description: payload.description,
        }
    }
}

impl From<LecturePayload> for LectureData {
    fn from(payload: LecturePayload) -> Self {
        LectureData {
            title: payload.title,
            media_ref: payload.video_url,
            duration_secs: payload.duration,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSectionRequest {
    pub course_id: String,
    pub section: SectionPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLectureRequest {
    pub course_id: String,
    pub section_id: String,
    pub lecture_data: LecturePayload,
}

/// Drag-and-drop of one lecture.
///
/// `from_order`/`to_order` are raw JSON; anything but a non-negative
/// integer is rejected by `into_command`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveLectureRequest {
    pub course_id: String,
    pub lecture_id: String,
    pub from_section_id: String,
    pub to_section_id: String,
    pub from_order: Value,
    pub to_order: Value,
}

impl MoveLectureRequest {
    pub fn into_command(self) -> Result<MoveLectureCommand, CurriculumError> {
        Ok(MoveLectureCommand {
            course_id: parse_id("courseId", &self.course_id)?,
            lecture_id: parse_id("lectureId", &self.lecture_id)?,
            from_section: parse_id("fromSectionId", &self.from_section_id)?,
            to_section: parse_id("toSectionId", &self.to_section_id)?,
            from: parse_position("fromOrder", &self.from_order)?,
            to: parse_position("toOrder", &self.to_order)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLectureRequest {
    pub course_id: String,
    pub lecture_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditLectureRequest {
    pub course_id: String,
    pub lecture_id: String,
    pub lecture_data: LecturePayload,
}

/// Callback from the transcoding pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedLectureRequest {
    pub user_id: String,
    pub course_id: String,
    pub section_id: String,
    pub lecture_id: String,
    /// Storage key of the processed media
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCurriculumRequest {
    pub course_id: String,
}

/// Every request the handler accepts, tagged by `action`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CurriculumRequest {
    AddSection(AddSectionRequest),
    AddLecture(AddLectureRequest),
    MoveLecture(MoveLectureRequest),
    RemoveLecture(RemoveLectureRequest),
    EditLecture(EditLectureRequest),
    ProcessedLecture(ProcessedLectureRequest),
    GetCurriculum(GetCurriculumRequest),
    GetInstructorCurriculum(GetCurriculumRequest),
}

impl CurriculumRequest {
    pub fn action(&self) -> &'static str {
        match self {
            CurriculumRequest::AddSection(_) => "add_section",
            CurriculumRequest::AddLecture(_) => "add_lecture",
            CurriculumRequest::MoveLecture(_) => "move_lecture",
            CurriculumRequest::RemoveLecture(_) => "remove_lecture",
            CurriculumRequest::EditLecture(_) => "edit_lecture",
            CurriculumRequest::ProcessedLecture(_) => "processed_lecture",
            CurriculumRequest::GetCurriculum(_) => "get_curriculum",
            CurriculumRequest::GetInstructorCurriculum(_) => "get_instructor_curriculum",
        }
    }
}

// ============================================================
// OUTGOING RESPONSES
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code (`bad_request`, `forbidden`, ...)
    pub code: String,
    pub message: String,
}

/// Uniform response envelope: `{success, data, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumResponse {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<ErrorBody>,
}

impl CurriculumResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &CurriculumError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: err.code().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

// ============================================================
// CONVERSIONS
// ============================================================

/// Parse an external identifier, naming the offending field on failure.
pub fn parse_id<T: FromStr>(field: &str, raw: &str) -> Result<T, CurriculumError> {
    raw.trim()
        .parse()
        .map_err(|_| CurriculumError::InvalidRequest(format!("{field} is not a valid id: {raw:?}")))
}

/// Accept only non-negative JSON integers that fit a `Position`.
pub fn parse_position(field: &str, value: &Value) -> Result<Position, CurriculumError> {
    let invalid = || {
        CurriculumError::InvalidRequest(format!(
            "{field} must be a non-negative integer, got {value}"
        ))
    };
    let Some(raw) = value.as_i64() else {
        return Err(invalid());
    };
    Position::try_from(raw).map_err(|_| invalid())
}

pub fn parse_instructor(raw: &str) -> Result<InstructorId, CurriculumError> {
    parse_id("userId", raw)
}

pub fn parse_course(raw: &str) -> Result<CourseId, CurriculumError> {
    parse_id("courseId", raw)
}

pub fn parse_section(raw: &str) -> Result<SectionId, CurriculumError> {
    parse_id("sectionId", raw)
}

pub fn parse_lecture(raw: &str) -> Result<LectureId, CurriculumError> {
    parse_id("lectureId", raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_accepts_integers_only() {
        assert_eq!(parse_position("toOrder", &json!(3)).unwrap(), Position::new(3));
        for bad in [json!(-1), json!(1.5), json!("2"), json!(null), json!(u64::MAX)] {
            assert!(
                matches!(parse_position("toOrder", &bad), Err(CurriculumError::InvalidRequest(_))),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn test_move_request_from_json() {
        let course = CourseId::new();
        let lecture = LectureId::new();
        let section = SectionId::new();
        let request: CurriculumRequest = serde_json::from_value(json!({
            "action": "move_lecture",
            "courseId": course.to_string(),
            "lectureId": lecture.to_string(),
            "fromSectionId": section.to_string(),
            "toSectionId": section.to_string(),
            "fromOrder": 4,
            "toOrder": 1,
        }))
        .unwrap();

        let CurriculumRequest::MoveLecture(mv) = request else {
            panic!("wrong variant");
        };
        let command = mv.into_command().unwrap();
        assert_eq!(command.course_id, course);
        assert_eq!(command.lecture_id, lecture);
        assert!(command.is_within_section());
        assert_eq!(command.from, Position::new(4));
        assert_eq!(command.to, Position::new(1));
    }

    #[test]
    fn test_bad_id_names_field() {
        let err = parse_section("not-a-uuid").unwrap_err();
        assert!(err.to_string().contains("sectionId"));
    }

    #[test]
    fn test_lecture_payload_field_names() {
        let payload: LecturePayload = serde_json::from_value(json!({
            "title": "Lifetimes",
            "videoUrl": "uploads/lifetimes.mp4",
            "duration": 540,
        }))
        .unwrap();
        let data = LectureData::from(payload);
        assert_eq!(data.media_ref, "uploads/lifetimes.mp4");
        assert_eq!(data.duration_secs, 540);
    }
}
