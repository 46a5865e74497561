//! Saga state machine.

/// The state of a course-creation saga in its lifecycle.
///
/// State transitions:
/// ```text
/// Idle ──► CourseCreated ──► AssetUploaded ──► Linked
///              │                  │                (terminal success)
///              └──────────────────┴──► RollingBack ──► Failed
///                                                      (terminal)
/// ```
///
/// The state lives only on the caller's stack for the duration of one
/// invocation; there is no durable saga log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SagaState {
    /// No step has run yet.
    #[default]
    Idle,

    /// The course row exists in the relational store.
    CourseCreated,

    /// The binary is in the object store with a resolved public address.
    AssetUploaded,

    /// The video row links the asset to the course (terminal success).
    Linked,

    /// A step failed and compensations are running in reverse order.
    RollingBack,

    /// Rollback finished after a failure (terminal).
    Failed,
}

impl SagaState {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaState::Linked | SagaState::Failed)
    }

    /// Returns true if compensation may begin from this state.
    pub fn can_roll_back(&self) -> bool {
        matches!(
            self,
            SagaState::CourseCreated | SagaState::AssetUploaded
        )
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaState::Idle => "Idle",
            SagaState::CourseCreated => "CourseCreated",
            SagaState::AssetUploaded => "AssetUploaded",
            SagaState::Linked => "Linked",
            SagaState::RollingBack => "RollingBack",
            SagaState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for SagaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
