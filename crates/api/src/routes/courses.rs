//! Course endpoints: listing, lookup, deletion, and the creation saga.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use common::CourseId;
use domain::{Course, CourseDraft, Difficulty, Video, VideoDraft, VideoFile};
use saga::{CourseSagaCoordinator, TracingInvalidations, TracingNotifications};
use store::{CatalogStore, ObjectStore};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<C: CatalogStore, O: ObjectStore> {
    pub coordinator: CourseSagaCoordinator<C, O, TracingNotifications, TracingInvalidations>,
}

fn parse_course_id(id: &str) -> Result<CourseId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid course id: {e}")))
}

/// Multipart fields accepted by `POST /courses`.
#[derive(Default)]
struct CreateCourseForm {
    title: String,
    description: Option<String>,
    instructor_name: Option<String>,
    duration_hours: Option<u32>,
    difficulty: Option<Difficulty>,
    video_title: String,
    video_duration_minutes: Option<u32>,
    video_description: Option<String>,
    video_file: Option<VideoFile>,
}

impl CreateCourseForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        fn bad(e: impl std::fmt::Display) -> ApiError {
            ApiError::BadRequest(format!("Invalid multipart body: {e}"))
        }

        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(bad)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => form.title = field.text().await.map_err(bad)?,
                "description" => form.description = Some(field.text().await.map_err(bad)?),
                "instructor_name" => {
                    form.instructor_name = Some(field.text().await.map_err(bad)?);
                }
                "duration_hours" => {
                    let text = field.text().await.map_err(bad)?;
                    form.duration_hours = Some(text.parse().map_err(bad)?);
                }
                "difficulty" => {
                    let text = field.text().await.map_err(bad)?;
                    form.difficulty = Some(Difficulty::parse(&text).ok_or_else(|| {
                        ApiError::BadRequest(format!("Unknown difficulty '{text}'"))
                    })?);
                }
                "video_title" => form.video_title = field.text().await.map_err(bad)?,
                "video_duration_minutes" => {
                    let text = field.text().await.map_err(bad)?;
                    form.video_duration_minutes = Some(text.parse().map_err(bad)?);
                }
                "video_description" => {
                    form.video_description = Some(field.text().await.map_err(bad)?);
                }
                "video_file" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(bad)?;
                    form.video_file = Some(VideoFile::new(filename, content_type, bytes.to_vec()));
                }
                _ => {}
            }
        }
        Ok(form)
    }
}

/// POST /courses — multipart create-course-with-video, backed by the saga.
#[tracing::instrument(skip_all)]
pub async fn create<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Course>), ApiError>
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let form = CreateCourseForm::from_multipart(multipart).await?;
    let file = form
        .video_file
        .ok_or_else(|| ApiError::BadRequest("A 'video_file' part is required".to_string()))?;

    let draft = CourseDraft {
        title: form.title,
        description: form.description,
        instructor_name: form.instructor_name,
        duration_hours: form.duration_hours,
        difficulty: form.difficulty,
    };
    let video = VideoDraft {
        title: form.video_title,
        file,
        duration_minutes: form.video_duration_minutes,
        description: form.video_description,
    };

    let course = state.coordinator.create_course_with_video(draft, video).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// GET /courses — all courses, newest first.
pub async fn list<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
) -> Result<Json<Vec<Course>>, ApiError>
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let courses = state.coordinator.catalog().list_courses().await?;
    Ok(Json(courses))
}

/// GET /courses/{id} — a single course.
pub async fn get<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<String>,
) -> Result<Json<Course>, ApiError>
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let id = parse_course_id(&id)?;
    let course = state
        .coordinator
        .catalog()
        .get_course(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Course not found: {id}")))?;
    Ok(Json(course))
}

/// DELETE /courses/{id} — standalone course deletion (no saga).
pub async fn delete<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let id = parse_course_id(&id)?;
    state.coordinator.delete_course(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /courses/{id}/videos — a course's videos, oldest first.
pub async fn videos<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Video>>, ApiError>
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let id = parse_course_id(&id)?;
    let videos = state.coordinator.catalog().list_videos(id).await?;
    Ok(Json(videos))
}
