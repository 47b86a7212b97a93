//! Application layer: orchestration of the ordering engine.

pub mod service;


pub use service::LectureOrderingService;
