//! Curriculum Service
//!
//! Boundary in front of the ordering engine. Every mutating call checks,
//! in order:
//! 1. the course exists and the caller owns it
//! 2. every referenced section/lecture belongs to that course
//! 3. the payload content is acceptable
//!
//! and only then hands a typed request to the engine.

use crate::config::CurriculumConfig;
use crate::domain::entities::{Curriculum, SectionWithLectures};
use crate::domain::errors::CurriculumError;
use crate::domain::value_objects::MoveLectureCommand;
use crate::ports::inbound::CurriculumApi;
use crate::ports::outbound::CourseDirectory;
use async_trait::async_trait;
use cm_01_lecture_ordering::{
    validate_lecture_data, CrossSectionMove, LectureOrderingApi, WithinSectionMove,
};
use shared_types::{
    Course, CourseId, InstructorId, Lecture, LectureData, LectureId, Section, SectionData,
    SectionId,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct CurriculumService<O: LectureOrderingApi, D: CourseDirectory> {
    ordering: Arc<O>,
    directory: Arc<D>,
    config: CurriculumConfig,
}

impl<O: LectureOrderingApi, D: CourseDirectory> CurriculumService<O, D> {
    pub fn new(ordering: Arc<O>, directory: Arc<D>) -> Self {
        Self::with_config(ordering, directory, CurriculumConfig::default())
    }

    pub fn with_config(ordering: Arc<O>, directory: Arc<D>, config: CurriculumConfig) -> Self {
        Self {
            ordering,
            directory,
            config,
        }
    }

    pub fn ordering(&self) -> &Arc<O> {
        &self.ordering
    }

    async fn find_course(&self, course_id: CourseId) -> Result<Course, CurriculumError> {
        self.directory
            .find_course(course_id)
            .await?
            .ok_or(CurriculumError::CourseNotFound(course_id))
    }

    async fn authorize(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
    ) -> Result<Course, CurriculumError> {
        let course = self.find_course(course_id).await?;
        if course.instructor_id != instructor {
            warn!(
                course_id = %course_id,
                instructor_id = %instructor,
                "[cm-02] rejected: caller does not own course"
            );
            return Err(CurriculumError::NotCourseOwner {
                course_id,
                instructor_id: instructor,
            });
        }
        Ok(course)
    }

    async fn section_in_course(
        &self,
        section_id: SectionId,
        course_id: CourseId,
    ) -> Result<Section, CurriculumError> {
        let section = self.ordering.get_section(section_id).await?;
        if section.course_id != course_id {
            return Err(CurriculumError::SectionNotInCourse {
                section_id,
                course_id,
            });
        }
        Ok(section)
    }

    async fn lecture_in_course(
        &self,
        lecture_id: LectureId,
        course_id: CourseId,
    ) -> Result<Lecture, CurriculumError> {
        let lecture = self.ordering.get_lecture(lecture_id).await?;
        if lecture.course_id != course_id {
            return Err(CurriculumError::LectureNotInCourse {
                lecture_id,
                course_id,
            });
        }
        Ok(lecture)
    }

    fn check_text(&self, field: &str, value: &str, max: usize) -> Result<(), CurriculumError> {
        if value.trim().is_empty() {
            return Err(CurriculumError::InvalidRequest(format!("{field} is required")));
        }
        if value.chars().count() > max {
            return Err(CurriculumError::InvalidRequest(format!(
                "{field} exceeds {max} characters"
            )));
        }
        Ok(())
    }

    fn check_lecture(&self, data: &LectureData) -> Result<(), CurriculumError> {
        validate_lecture_data(data)?;
        self.check_text("title", &data.title, self.config.max_title_chars)?;
        if data.duration_secs > self.config.max_duration_secs {
            return Err(CurriculumError::InvalidRequest(format!(
                "duration exceeds {} seconds",
                self.config.max_duration_secs
            )));
        }
        Ok(())
    }

    async fn assemble(&self, course_id: CourseId) -> Result<Curriculum, CurriculumError> {
        let sections = self.ordering.list_sections(course_id).await?;
        let mut assembled = Vec::with_capacity(sections.len());
        for section in sections {
            let lectures = self.ordering.list_ordered(section.id).await?;
            assembled.push(SectionWithLectures { section, lectures });
        }
        Ok(Curriculum {
            course_id,
            sections: assembled,
        })
    }
}

#[async_trait]
impl<O: LectureOrderingApi, D: CourseDirectory> CurriculumApi for CurriculumService<O, D> {
    async fn add_section(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
        data: SectionData,
    ) -> Result<Section, CurriculumError> {
        self.check_text("title", &data.title, self.config.max_title_chars)?;
        self.check_text(
            "description",
            &data.description,
            self.config.max_description_chars,
        )?;
        self.authorize(instructor, course_id).await?;

        let section = self.ordering.append_section(course_id, data).await?;
        info!(
            course_id = %course_id,
            section_id = %section.id,
            "[cm-02] section added"
        );
        Ok(section)
    }

    async fn add_lecture(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
        section_id: SectionId,
        data: LectureData,
    ) -> Result<Lecture, CurriculumError> {
        self.check_lecture(&data)?;
        self.authorize(instructor, course_id).await?;
        self.section_in_course(section_id, course_id).await?;

        let lecture = self.ordering.append_lecture(section_id, data).await?;
        info!(
            course_id = %course_id,
            section_id = %section_id,
            lecture_id = %lecture.id,
            order = lecture.order,
            "[cm-02] lecture added"
        );
        Ok(lecture)
    }

    async fn move_lecture(
        &self,
        instructor: InstructorId,
        command: MoveLectureCommand,
    ) -> Result<Lecture, CurriculumError> {
        self.authorize(instructor, command.course_id).await?;
        self.section_in_course(command.from_section, command.course_id)
            .await?;

        let moved = if command.is_within_section() {
            let mv = WithinSectionMove::new(
                command.from_section,
                command.lecture_id,
                command.from,
                command.to,
            )?;
            self.ordering.move_within_section(mv).await?
        } else {
            self.section_in_course(command.to_section, command.course_id)
                .await?;
            let mv = CrossSectionMove::new(
                command.lecture_id,
                command.from_section,
                command.to_section,
                command.from,
                command.to,
            )?;
            self.ordering.move_across_sections(mv).await?
        };

        debug!(
            course_id = %command.course_id,
            lecture_id = %command.lecture_id,
            section_id = %moved.section_id,
            order = moved.order,
            "[cm-02] lecture moved"
        );
        Ok(moved)
    }

    async fn remove_lecture(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
        lecture_id: LectureId,
    ) -> Result<Lecture, CurriculumError> {
        self.authorize(instructor, course_id).await?;
        self.lecture_in_course(lecture_id, course_id).await?;
        Ok(self.ordering.remove_lecture(lecture_id).await?)
    }

    async fn edit_lecture(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
        lecture_id: LectureId,
        data: LectureData,
    ) -> Result<Lecture, CurriculumError> {
        self.check_lecture(&data)?;
        self.authorize(instructor, course_id).await?;
        self.lecture_in_course(lecture_id, course_id).await?;
        Ok(self
            .ordering
            .update_lecture_details(lecture_id, data)
            .await?)
    }

    async fn record_processed_lecture(
        &self,
        owner: InstructorId,
        course_id: CourseId,
        section_id: SectionId,
        lecture_id: LectureId,
        processed_key: String,
    ) -> Result<Lecture, CurriculumError> {
        if processed_key.trim().is_empty() {
            return Err(CurriculumError::InvalidRequest(
                "processed key is required".to_string(),
            ));
        }
        self.authorize(owner, course_id).await?;
        let lecture = self.lecture_in_course(lecture_id, course_id).await?;
        if lecture.section_id != section_id {
            return Err(CurriculumError::LectureNotInSection {
                lecture_id,
                section_id,
            });
        }

        let updated = self
            .ordering
            .mark_processed(lecture_id, processed_key)
            .await?;
        info!(
            course_id = %course_id,
            lecture_id = %lecture_id,
            "[cm-02] processed media recorded"
        );
        Ok(updated)
    }

    async fn get_curriculum(&self, course_id: CourseId) -> Result<Curriculum, CurriculumError> {
        self.find_course(course_id).await?;
        self.assemble(course_id).await
    }

    async fn get_instructor_curriculum(
        &self,
        instructor: InstructorId,
        course_id: CourseId,
    ) -> Result<Curriculum, CurriculumError> {
        self.authorize(instructor, course_id).await?;
        self.assemble(course_id).await
    }
}
