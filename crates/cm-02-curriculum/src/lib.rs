//! # CM-02: Curriculum Service
//!
//! Boundary in front of the lecture ordering engine: checks that the caller
//! owns the course, that every referenced section and lecture belongs to
//! it, and turns loosely typed request payloads into validated engine
//! requests.
//!
//! ## Architecture
//!
//! - **Domain**: `Curriculum` view, `MoveLectureCommand`, `CurriculumError`
//! - **Ports**: Inbound (`CurriculumApi`) and Outbound (`CourseDirectory`)
//! - **Adapters**: `InMemoryCourseDirectory`
//! - **Application**: `CurriculumService`
//! - **IPC**: `CurriculumHandler` with `{success, data, error}` responses

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ipc;
pub mod ports;

pub use adapters::InMemoryCourseDirectory;
pub use application::CurriculumService;
pub use config::CurriculumConfig;
pub use domain::entities::{Curriculum, SectionWithLectures};
pub use domain::errors::CurriculumError;
pub use domain::value_objects::MoveLectureCommand;
pub use ipc::{CurriculumHandler, CurriculumRequest, CurriculumResponse, ErrorBody};
pub use ports::inbound::CurriculumApi;
pub use ports::outbound::CourseDirectory;
