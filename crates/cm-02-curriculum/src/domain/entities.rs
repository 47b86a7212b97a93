//! Domain entities for the Curriculum Service

use serde::{Deserialize, Serialize};
use shared_types::{CourseId, Lecture, Section};

/// One section with its lectures in play order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionWithLectures {
    pub section: Section,
    pub lectures: Vec<Lecture>,
}

impl SectionWithLectures {
    pub fn total_duration_secs(&self) -> u64 {
        self.lectures
            .iter()
            .map(|lecture| u64::from(lecture.duration_secs))
            .sum()
    }
}

/// A course's full curriculum: sections in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    pub course_id: CourseId,
    pub sections: Vec<SectionWithLectures>,
}

impl Curriculum {
    pub fn lecture_count(&self) -> usize {
        self.sections.iter().map(|s| s.lectures.len()).sum()
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.sections
            .iter()
            .map(SectionWithLectures::total_duration_secs)
            .sum()
    }
}
