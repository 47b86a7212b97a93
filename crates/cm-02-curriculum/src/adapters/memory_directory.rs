//! In-memory course directory

use crate::domain::errors::CurriculumError;
use crate::ports::outbound::CourseDirectory;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Course, CourseId, InstructorId};
use std::collections::HashMap;

#[derive(Default)]
pub struct InMemoryCourseDirectory {
    courses: RwLock<HashMap<CourseId, Course>>,
}

impl InMemoryCourseDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, course: Course) {
        self.courses.write().insert(course.id, course);
    }

    /// Create and register a course owned by `instructor_id`.
    pub fn create_course(&self, instructor_id: InstructorId, title: &str) -> Course {
        let course = Course {
            id: CourseId::new(),
            instructor_id,
            title: title.to_string(),
        };
        self.insert(course.clone());
        course
    }
}

#[async_trait]
impl CourseDirectory for InMemoryCourseDirectory {
    async fn find_course(&self, course_id: CourseId) -> Result<Option<Course>, CurriculumError> {
        Ok(self.courses.read().get(&course_id).cloned())
    }
}
