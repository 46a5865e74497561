//! Data model for the course catalog.
//!
//! This crate holds the persisted entities (`Course`, `Video`, `Enrollment`),
//! the input drafts (`CourseDraft`, `VideoDraft`) with their validation rules,
//! and the transient `VideoAsset` produced by a successful upload.
//!
//! Validation is a precondition of the creation saga, not a saga step: a draft
//! that fails validation never reaches a backend.

pub mod course;
pub mod enrollment;
pub mod error;
pub mod video;

pub use course::{Course, CourseDraft, Difficulty};
pub use enrollment::Enrollment;
pub use error::ValidationError;
pub use video::{MAX_UPLOAD_BYTES, NewVideo, Video, VideoAsset, VideoDraft, VideoFile};
