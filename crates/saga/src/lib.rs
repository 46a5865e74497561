//! Course-creation saga.
//!
//! Creating a course with its first video touches two independently-failing
//! backends: the relational catalog store (course and video rows) and the
//! binary object store (the uploaded file). The two cannot be updated in one
//! transaction, so this crate sequences the writes and compensates completed
//! steps in reverse order when a later step fails:
//!
//! 1. Insert the course row.
//! 2. Upload the video binary and resolve its public address.
//! 3. Insert the video row linking the address to the course.
//!
//! Every step runs under a hard deadline. Compensation is best-effort: its
//! failures are logged and swallowed, and the caller always sees the error
//! that triggered the rollback, never a compensation error.

pub mod coordinator;
pub mod deadline;
pub mod error;
pub mod run;
pub mod sinks;
pub mod state;
pub mod storage_key;

pub use coordinator::CourseSagaCoordinator;
pub use deadline::{Deadlines, with_deadline};
pub use error::SagaError;
pub use run::SagaRun;
pub use sinks::{
    CacheInvalidator, NotificationSink, RecordingInvalidations, RecordingNotifications,
    TracingInvalidations, TracingNotifications, course_list_tag, course_tag,
};
pub use state::SagaState;
pub use storage_key::storage_key;
