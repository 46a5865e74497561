//! Saga error types.

use std::time::Duration;

use domain::ValidationError;
use store::StoreError;
use thiserror::Error;

/// Errors surfaced by saga operations.
///
/// The saga always rejects with the error that triggered its rollback;
/// compensation failures are logged inside the coordinator and never appear
/// here.
#[derive(Debug, Error)]
pub enum SagaError {
    /// A draft violated a precondition; no backend was contacted.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A step exceeded its deadline and was abandoned.
    #[error("request timed out while {label} after {}s", budget.as_secs())]
    Timeout {
        label: &'static str,
        budget: Duration,
    },

    /// A backend reported an error; message passed through.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The object store could not produce a public address for an uploaded
    /// object. Treated as an upload failure; an empty address is not a valid
    /// video asset.
    #[error("failed to get public URL for uploaded video '{key}'")]
    MissingPublicUrl { key: String },
}

impl SagaError {
    /// Returns true for deadline failures.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SagaError::Timeout { .. })
    }

    /// Returns true for precondition failures raised before any backend call.
    pub fn is_validation(&self) -> bool {
        matches!(self, SagaError::Validation(_))
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
