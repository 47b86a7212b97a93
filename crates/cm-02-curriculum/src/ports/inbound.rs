//! Inbound Ports (Driving Ports / API)
//!
//! `instructor` is always the authenticated caller. Token verification
//! happens before these are invoked.

use crate::domain::entities::Curriculum;
use crate::domain::errors::CurriculumError;
use crate::domain::value_objects::MoveLectureCommand;
use async_trait::async_trait;
use shared_types::{
    CourseId, InstructorId, Lecture, LectureData, LectureId, Section, SectionData, SectionId,
};

/// Primary Curriculum API
#[async_trait]
pub trait CurriculumApi: Send + Sync {
    /// Append a section to a course the instructor owns.
    async fn add_section(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
        data: SectionData,
    ) -> Result<Section, CurriculumError>;

    /// Append a lecture to a section of a course the instructor owns.
    async fn add_lecture(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
        section_id: SectionId,
        data: LectureData,
    ) -> Result<Lecture, CurriculumError>;

    /// Reorder a lecture, within its section or into another one.
    async fn move_lecture(
        &self,
        instructor: InstructorId,
        command: MoveLectureCommand,
    ) -> Result<Lecture, CurriculumError>;

    async fn remove_lecture(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
        lecture_id: LectureId,
    ) -> Result<Lecture, CurriculumError>;

    async fn edit_lecture(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
        lecture_id: LectureId,
        data: LectureData,
    ) -> Result<Lecture, CurriculumError>;

    /// Transcoding pipeline callback: the lecture's media now lives at
    /// `processed_key`.
    async fn record_processed_lecture(
        &self,
        owner: InstructorId,
        course_id: CourseId,
        section_id: SectionId,
        lecture_id: LectureId,
        processed_key: String,
    ) -> Result<Lecture, CurriculumError>;

    /// Public curriculum view.
    async fn get_curriculum(&self, course_id: CourseId) -> Result<Curriculum, CurriculumError>;

    /// Curriculum view restricted to the owning instructor.
    async fn get_instructor_curriculum(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
    ) -> Result<Curriculum, CurriculumError>;
}
