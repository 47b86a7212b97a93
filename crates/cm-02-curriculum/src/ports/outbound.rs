//! Outbound Ports (Driven Ports / SPI)

use crate::domain::errors::CurriculumError;
use async_trait::async_trait;
use shared_types::{Course, CourseId};

/// Lookup of course records (owner and title).
///
/// Course CRUD lives outside this subsystem; only reads are needed here.
#[async_trait]
pub trait CourseDirectory: Send + Sync {
    async fn find_course(&self, course_id: CourseId) -> Result<Option<Course>, CurriculumError>;
}
