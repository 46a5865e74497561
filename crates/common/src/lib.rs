//! Shared identifier newtypes used across the course catalog.

mod types;

pub use types::{CourseId, EnrollmentId, UserId, VideoId};
