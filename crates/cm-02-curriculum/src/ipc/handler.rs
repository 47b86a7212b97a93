//! IPC Handler for the Curriculum Service
//!
//! Maps tagged request payloads onto `CurriculumApi` calls and shapes every
//! outcome into a `CurriculumResponse`. Failures never escape as `Err`: the
//! caller always gets `{success: false, error}`.

use crate::application::service::CurriculumService;
use crate::domain::errors::CurriculumError;
use crate::ipc::payloads::{
    parse_course, parse_instructor, parse_lecture, parse_section, CurriculumRequest,
    CurriculumResponse,
};
use crate::ports::inbound::CurriculumApi;
use crate::ports::outbound::CourseDirectory;
use cm_01_lecture_ordering::LectureOrderingApi;
use serde::Serialize;
use shared_types::InstructorId;
use std::time::Instant;
use tracing::{info, warn};

/// IPC Handler for the Curriculum Service.
pub struct CurriculumHandler<O: LectureOrderingApi, D: CourseDirectory> {
    service: CurriculumService<O, D>,
}

impl<O: LectureOrderingApi, D: CourseDirectory> CurriculumHandler<O, D> {
    pub fn new(service: CurriculumService<O, D>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &CurriculumService<O, D> {
        &self.service
    }

    /// Handle one request on behalf of `caller`.
    ///
    /// `caller` is the authenticated instructor. The transcoding callback
    /// ignores it and authorizes against the owner named in its payload.
    pub async fn handle(
        &self,
        caller: InstructorId,
        request: CurriculumRequest,
    ) -> CurriculumResponse {
        let start_time = Instant::now();
        let action = request.action();

        let outcome = self.dispatch(caller, request).await;
        let elapsed_ms = start_time.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) => {
                info!(action, elapsed_ms, "[cm-02] request handled");
                response
            }
            Err(err) => {
                warn!(
                    action,
                    elapsed_ms,
                    code = err.code(),
                    error = %err,
                    "[cm-02] request failed"
                );
                CurriculumResponse::failure(&err)
            }
        }
    }

    async fn dispatch(
        &self,
        caller: InstructorId,
        request: CurriculumRequest,
    ) -> Result<CurriculumResponse, CurriculumError> {
        match request {
            CurriculumRequest::AddSection(req) => {
                let course_id = parse_course(&req.course_id)?;
                respond(
                    self.service
                        .add_section(caller, course_id, req.section.into())
                        .await?,
                )
            }
            CurriculumRequest::AddLecture(req) => {
                let course_id = parse_course(&req.course_id)?;
                let section_id = parse_section(&req.section_id)?;
                respond(
                    self.service
                        .add_lecture(caller, course_id, section_id, req.lecture_data.into())
                        .await?,
                )
            }
            CurriculumRequest::MoveLecture(req) => {
                let command = req.into_command()?;
                respond(self.service.move_lecture(caller, command).await?)
            }
            CurriculumRequest::RemoveLecture(req) => {
                let course_id = parse_course(&req.course_id)?;
                let lecture_id = parse_lecture(&req.lecture_id)?;
                respond(
                    self.service
                        .remove_lecture(caller, course_id, lecture_id)
                        .await?,
                )
            }
            CurriculumRequest::EditLecture(req) => {
                let course_id = parse_course(&req.course_id)?;
                let lecture_id = parse_lecture(&req.lecture_id)?;
                respond(
                    self.service
                        .edit_lecture(caller, course_id, lecture_id, req.lecture_data.into())
                        .await?,
                )
            }
            CurriculumRequest::ProcessedLecture(req) => {
                let owner = parse_instructor(&req.user_id)?;
                let course_id = parse_course(&req.course_id)?;
                let section_id = parse_section(&req.section_id)?;
                let lecture_id = parse_lecture(&req.lecture_id)?;
                self.service
                    .record_processed_lecture(owner, course_id, section_id, lecture_id, req.key)
                    .await?;
                Ok(CurriculumResponse::ok(serde_json::json!({
                    "message": "Lecture Updated Successfully"
                })))
            }
            CurriculumRequest::GetCurriculum(req) => {
                let course_id = parse_course(&req.course_id)?;
                respond(self.service.get_curriculum(course_id).await?)
            }
            CurriculumRequest::GetInstructorCurriculum(req) => {
                let course_id = parse_course(&req.course_id)?;
                respond(
                    self.service
                        .get_instructor_curriculum(caller, course_id)
                        .await?,
                )
            }
        }
    }
}

fn respond<T: Serialize>(data: T) -> Result<CurriculumResponse, CurriculumError> {
    let value = serde_json::to_value(data)
        .map_err(|e| CurriculumError::InvalidRequest(format!("response encoding failed: {e}")))?;
    Ok(CurriculumResponse::ok(value))
}
