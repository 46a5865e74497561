//! Enrollment entity.

use chrono::{DateTime, Utc};
use common::{CourseId, EnrollmentId, UserId};
use serde::{Deserialize, Serialize};

/// Links a user to a course they enrolled in.
///
/// Unique per (user, course) pair; the store enforces the constraint.
/// Enrollments are independent reads/writes, never produced by the
/// course-creation saga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    /// Creates an enrollment at the given instant with a fresh id.
    pub fn new(user_id: UserId, course_id: CourseId, now: DateTime<Utc>) -> Self {
        Self {
            id: EnrollmentId::new(),
            user_id,
            course_id,
            enrolled_at: now,
        }
    }
}
