//! Store error types.

use common::{CourseId, UserId};
use thiserror::Error;

/// Errors reported by the relational or object store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected the operation; message passed through verbatim.
    #[error("{0}")]
    Backend(String),

    /// Referenced course row does not exist.
    #[error("course not found: {0}")]
    CourseNotFound(CourseId),

    /// The (user, course) pair is already enrolled.
    #[error("user {user_id} is already enrolled in course {course_id}")]
    DuplicateEnrollment { user_id: UserId, course_id: CourseId },

    /// Database error from the PostgreSQL backend.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Transport-level failure talking to the object store.
    #[error("object store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The object store returned a non-success status.
    #[error("object store returned {status} for '{key}': {message}")]
    Object {
        status: u16,
        key: String,
        message: String,
    },
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
