//! Configuration for the Curriculum Service

use serde::{Deserialize, Serialize};

/// Boundary validation limits
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurriculumConfig {
    /// Longest accepted section or lecture title (characters)
    pub max_title_chars: usize,
    /// Longest accepted section description (characters)
    pub max_description_chars: usize,
    /// Longest accepted lecture duration
    pub max_duration_secs: u32,
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        Self {
            max_title_chars: 200,
            max_description_chars: 2_000,
            max_duration_secs: 24 * 60 * 60,
        }
    }
}
