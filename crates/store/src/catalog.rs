//! Relational catalog store trait.

use async_trait::async_trait;
use common::{CourseId, UserId};
use domain::{Course, CourseDraft, Enrollment, NewVideo, Video};

use crate::error::Result;

/// Client for the relational store holding courses, videos, and enrollments.
///
/// Implementations own id and timestamp assignment. The store enforces its
/// own concurrency control (unique keys, foreign keys); callers get a plain
/// error when a constraint is violated.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Inserts a course row from validated draft fields and returns the
    /// persisted course with its server-assigned id and timestamps.
    async fn insert_course(&self, draft: &CourseDraft) -> Result<Course>;

    /// Fetches a single course, or `None` when absent.
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>>;

    /// Lists all courses, newest first.
    async fn list_courses(&self) -> Result<Vec<Course>>;

    /// Deletes a course row and its dependent rows. Deleting an absent
    /// course is not an error.
    async fn delete_course(&self, id: CourseId) -> Result<()>;

    /// Inserts a video row linked to a course.
    async fn insert_video(&self, new: NewVideo) -> Result<Video>;

    /// Lists the videos of a course, oldest first.
    async fn list_videos(&self, course_id: CourseId) -> Result<Vec<Video>>;

    /// Enrolls a user in a course. A second enrollment for the same
    /// (user, course) pair fails with `DuplicateEnrollment`.
    async fn insert_enrollment(&self, user_id: UserId, course_id: CourseId) -> Result<Enrollment>;

    /// Removes a user's enrollment in a course, if any.
    async fn delete_enrollment(&self, user_id: UserId, course_id: CourseId) -> Result<()>;

    /// Fetches a user's enrollment in a course, or `None` when absent.
    async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>>;

    /// Lists all enrollments of a user.
    async fn list_enrollments(&self, user_id: UserId) -> Result<Vec<Enrollment>>;
}
