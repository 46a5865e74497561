//! Per-invocation saga bookkeeping.

use common::CourseId;

use crate::state::SagaState;

/// Tracks one saga invocation: the current state and the references needed
/// for compensation (the created course id and the uploaded storage key).
#[derive(Debug, Default)]
pub struct SagaRun {
    state: SagaState,
    course_id: Option<CourseId>,
    uploaded_key: Option<String>,
}

impl SagaRun {
    /// Starts a run in `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SagaState {
        self.state
    }

    /// The course created in step 1, if the run got that far.
    pub fn course_id(&self) -> Option<CourseId> {
        self.course_id
    }

    /// The storage key uploaded in step 2, if the run got that far.
    pub fn uploaded_key(&self) -> Option<&str> {
        self.uploaded_key.as_deref()
    }

    /// Records step 1 success.
    pub fn course_created(&mut self, course_id: CourseId) {
        self.course_id = Some(course_id);
        self.state = SagaState::CourseCreated;
    }

    /// Records step 2 success.
    pub fn asset_uploaded(&mut self, key: String) {
        self.uploaded_key = Some(key);
        self.state = SagaState::AssetUploaded;
    }

    /// Records step 3 success (terminal).
    pub fn linked(&mut self) {
        self.state = SagaState::Linked;
    }

    /// Enters compensation.
    pub fn rolling_back(&mut self) {
        self.state = SagaState::RollingBack;
    }

    /// Records the end of a failed run (terminal).
    pub fn failed(&mut self) {
        self.state = SagaState::Failed;
    }
}
