pub mod inbound;
pub mod outbound;

pub use inbound::CurriculumApi;
pub use outbound::CourseDirectory;
