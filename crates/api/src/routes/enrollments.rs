//! Enrollment endpoints.
//!
//! The auth provider is an external collaborator; its verified subject id
//! arrives as the `x-user-id` header.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use common::UserId;
use domain::Enrollment;
use store::{CatalogStore, ObjectStore};

use crate::error::ApiError;
use crate::routes::courses::AppState;

fn user_id(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing x-user-id header".to_string()))?;
    raw.parse()
        .map_err(|e| ApiError::Unauthorized(format!("Invalid x-user-id header: {e}")))
}

/// POST /courses/{id}/enrollments — enroll the caller in a course.
pub async fn enroll<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Enrollment>), ApiError>
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let user = user_id(&headers)?;
    let course = id
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid course id: {e}")))?;

    let enrollment = state
        .coordinator
        .catalog()
        .insert_enrollment(user, course)
        .await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// DELETE /courses/{id}/enrollments — unenroll the caller from a course.
pub async fn unenroll<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError>
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let user = user_id(&headers)?;
    let course = id
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid course id: {e}")))?;

    state
        .coordinator
        .catalog()
        .delete_enrollment(user, course)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /enrollments — the caller's enrollments.
pub async fn list<C, O>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Enrollment>>, ApiError>
where
    C: CatalogStore + 'static,
    O: ObjectStore + 'static,
{
    let user = user_id(&headers)?;
    let enrollments = state.coordinator.catalog().list_enrollments(user).await?;
    Ok(Json(enrollments))
}
