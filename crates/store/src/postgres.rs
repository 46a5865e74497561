//! PostgreSQL-backed catalog store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CourseId, EnrollmentId, UserId, VideoId};
use domain::{Course, CourseDraft, Difficulty, Enrollment, NewVideo, Video};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::catalog::CatalogStore;
use crate::error::{Result, StoreError};

/// Catalog store backed by PostgreSQL.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    /// Creates a new PostgreSQL catalog store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_course(row: PgRow) -> Result<Course> {
        let difficulty = match row.try_get::<Option<String>, _>("difficulty")? {
            Some(s) => Some(
                Difficulty::parse(&s)
                    .ok_or_else(|| StoreError::Backend(format!("unknown difficulty '{s}'")))?,
            ),
            None => None,
        };

        Ok(Course {
            id: CourseId::from_uuid(row.try_get::<Uuid, _>("id")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            instructor_name: row.try_get("instructor_name")?,
            duration_hours: row
                .try_get::<Option<i32>, _>("duration_hours")?
                .map(|h| h as u32),
            difficulty,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }

    fn row_to_video(row: PgRow) -> Result<Video> {
        Ok(Video {
            id: VideoId::from_uuid(row.try_get::<Uuid, _>("id")?),
            course_id: CourseId::from_uuid(row.try_get::<Uuid, _>("course_id")?),
            title: row.try_get("title")?,
            video_url: row.try_get("video_url")?,
            duration_minutes: row
                .try_get::<Option<i32>, _>("duration_minutes")?
                .map(|m| m as u32),
            description: row.try_get("description")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }

    fn row_to_enrollment(row: PgRow) -> Result<Enrollment> {
        Ok(Enrollment {
            id: EnrollmentId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            course_id: CourseId::from_uuid(row.try_get::<Uuid, _>("course_id")?),
            enrolled_at: row.try_get::<DateTime<Utc>, _>("enrolled_at")?,
        })
    }

    fn pg_error_code(err: &sqlx::Error) -> Option<String> {
        if let sqlx::Error::Database(db) = err {
            db.code().map(|c| c.into_owned())
        } else {
            None
        }
    }
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn insert_course(&self, draft: &CourseDraft) -> Result<Course> {
        let row = sqlx::query(
            r#"
            INSERT INTO courses (title, description, instructor_name, duration_hours, difficulty)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.instructor_name)
        .bind(draft.duration_hours.map(|h| h as i32))
        .bind(draft.difficulty.map(|d| d.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_course(row)
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>> {
        let row = sqlx::query("SELECT * FROM courses WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_course).transpose()
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        let rows = sqlx::query("SELECT * FROM courses ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_course).collect()
    }

    async fn delete_course(&self, id: CourseId) -> Result<()> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_video(&self, new: NewVideo) -> Result<Video> {
        let row = sqlx::query(
            r#"
            INSERT INTO videos (course_id, title, video_url, duration_minutes, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.course_id.as_uuid())
        .bind(&new.title)
        .bind(&new.video_url)
        .bind(new.duration_minutes.map(|m| m as i32))
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if Self::pg_error_code(&e).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                StoreError::CourseNotFound(new.course_id)
            } else {
                e.into()
            }
        })?;

        Self::row_to_video(row)
    }

    async fn list_videos(&self, course_id: CourseId) -> Result<Vec<Video>> {
        let rows = sqlx::query("SELECT * FROM videos WHERE course_id = $1 ORDER BY created_at ASC")
            .bind(course_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_video).collect()
    }

    async fn insert_enrollment(&self, user_id: UserId, course_id: CourseId) -> Result<Enrollment> {
        let row = sqlx::query(
            r#"
            INSERT INTO enrollments (user_id, course_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match Self::pg_error_code(&e).as_deref() {
            Some(UNIQUE_VIOLATION) => StoreError::DuplicateEnrollment { user_id, course_id },
            Some(FOREIGN_KEY_VIOLATION) => StoreError::CourseNotFound(course_id),
            _ => e.into(),
        })?;

        Self::row_to_enrollment(row)
    }

    async fn delete_enrollment(&self, user_id: UserId, course_id: CourseId) -> Result<()> {
        sqlx::query("DELETE FROM enrollments WHERE user_id = $1 AND course_id = $2")
            .bind(user_id.as_uuid())
            .bind(course_id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>> {
        let row = sqlx::query("SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2")
            .bind(user_id.as_uuid())
            .bind(course_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_enrollment).transpose()
    }

    async fn list_enrollments(&self, user_id: UserId) -> Result<Vec<Enrollment>> {
        let rows = sqlx::query("SELECT * FROM enrollments WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_enrollment).collect()
    }
}
