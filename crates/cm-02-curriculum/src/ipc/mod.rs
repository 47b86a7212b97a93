//! IPC module for the Curriculum Service

pub mod handler;
pub mod payloads;

pub use handler::CurriculumHandler;
pub use payloads::*;
