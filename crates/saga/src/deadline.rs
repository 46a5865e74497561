//! Deadline guard for backend calls.

use std::time::Duration;

use crate::error::SagaError;

/// Per-step deadline budgets used by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadlines {
    /// Course row insert.
    pub course_insert: Duration,

    /// Video row insert.
    pub video_insert: Duration,

    /// Course row delete (compensation and standalone).
    pub course_delete: Duration,

    /// Object delete (compensation and standalone).
    pub file_delete: Duration,

    /// Binary upload; large payloads get a much bigger budget.
    pub upload: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            course_insert: Duration::from_secs(30),
            video_insert: Duration::from_secs(30),
            course_delete: Duration::from_secs(15),
            file_delete: Duration::from_secs(15),
            upload: Duration::from_secs(10 * 60),
        }
    }
}

impl Deadlines {
    /// Loads the budgets, honoring the `STORAGE_UPLOAD_TIMEOUT_MS` override
    /// for the upload deadline. Zero or unparsable values fall back to the
    /// 10-minute default.
    pub fn from_env() -> Self {
        let mut deadlines = Self::default();
        if let Some(ms) = std::env::var("STORAGE_UPLOAD_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
        {
            deadlines.upload = Duration::from_millis(ms);
        }
        deadlines
    }
}

/// Races an operation against a timer.
///
/// If the timer fires first the operation is abandoned and a
/// [`SagaError::Timeout`] carrying `label` and the budget is returned; if the
/// operation settles first its result passes through unchanged.
///
/// Abandonment drops the future, but a request already written to the socket
/// may still land at the backend after the deadline. A timed-out step can
/// therefore leave a late-arriving orphan behind; the saga does not retry or
/// correct for this.
pub async fn with_deadline<T, E, F>(
    operation: F,
    budget: Duration,
    label: &'static str,
) -> Result<T, SagaError>
where
    F: Future<Output = std::result::Result<T, E>>,
    SagaError: From<E>,
{
    match tokio::time::timeout(budget, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(SagaError::from(e)),
        Err(_) => Err(SagaError::Timeout { label, budget }),
    }
}
