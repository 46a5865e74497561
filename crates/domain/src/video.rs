//! Video entities: the upload draft, the transient asset, and the persisted row.

use chrono::{DateTime, Utc};
use common::{CourseId, VideoId};
use serde::{Deserialize, Serialize};

use crate::error::{self, ValidationError};

/// Maximum accepted video file size: 200 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 200 * 1024 * 1024;

/// A binary file submitted for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    /// Original filename, used to derive the storage key extension.
    pub filename: String,

    /// Declared MIME type; empty means unknown.
    pub content_type: String,

    /// File contents.
    pub bytes: Vec<u8>,
}

impl VideoFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Returns the declared content type, defaulting to
    /// `application/octet-stream` when none was declared.
    pub fn content_type_or_default(&self) -> &str {
        if self.content_type.is_empty() {
            "application/octet-stream"
        } else {
            &self.content_type
        }
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Input fields for a video that has not been uploaded or persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDraft {
    /// Video title, 1–200 characters.
    pub title: String,

    /// The binary to upload, at most [`MAX_UPLOAD_BYTES`].
    pub file: VideoFile,

    /// Optional running time in minutes, 1–600.
    pub duration_minutes: Option<u32>,

    /// Optional description, at most 500 characters.
    pub description: Option<String>,
}

impl VideoDraft {
    /// Checks all field constraints, including the upload size limit.
    pub fn validate(&self) -> Result<(), ValidationError> {
        error::required_text("video title", &self.title, 200)?;
        error::optional_text("video description", self.description.as_deref(), 500)?;
        error::optional_range("duration_minutes", self.duration_minutes, 1, 600)?;
        if self.file.size() > MAX_UPLOAD_BYTES {
            return Err(ValidationError::FileTooLarge {
                max: MAX_UPLOAD_BYTES,
                actual: self.file.size(),
            });
        }
        Ok(())
    }
}

/// Result of a successful binary upload.
///
/// Exists only between upload success and either successful linking or
/// compensating deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAsset {
    /// Opaque storage key under which the object was stored.
    pub path: String,

    /// Publicly resolvable address of the object.
    pub public_url: String,
}

/// Fields for inserting a video row linked to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVideo {
    pub course_id: CourseId,
    pub title: String,
    pub video_url: String,
    pub duration_minutes: Option<u32>,
    pub description: Option<String>,
}

/// A persisted video row linking an uploaded asset to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub course_id: CourseId,
    pub title: String,
    pub video_url: String,
    pub duration_minutes: Option<u32>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Materializes insert fields into a persisted row at the given instant.
    pub fn from_new(id: VideoId, new: &NewVideo, now: DateTime<Utc>) -> Self {
        Self {
            id,
            course_id: new.course_id,
            title: new.title.clone(),
            video_url: new.video_url.clone(),
            duration_minutes: new.duration_minutes,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> VideoDraft {
        VideoDraft {
            title: "Introduction".to_string(),
            file: VideoFile::new("intro.mp4", "video/mp4", vec![0u8; 1024]),
            duration_minutes: Some(15),
            description: Some("Course overview".to_string()),
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(valid_draft().validate().is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut draft = valid_draft();
        draft.title = "  ".to_string();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::Required {
                field: "video title"
            })
        );
    }

    #[test]
    fn oversized_file_is_rejected() {
        let mut draft = valid_draft();
        draft.file.bytes = vec![0u8; (MAX_UPLOAD_BYTES + 1) as usize];
        assert_eq!(
            draft.validate(),
            Err(ValidationError::FileTooLarge {
                max: MAX_UPLOAD_BYTES,
                actual: MAX_UPLOAD_BYTES + 1,
            })
        );
    }

    #[test]
    fn file_at_exactly_the_limit_is_accepted() {
        let mut draft = valid_draft();
        draft.file.bytes = vec![0u8; MAX_UPLOAD_BYTES as usize];
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn duration_minutes_out_of_range_is_rejected() {
        let mut draft = valid_draft();
        draft.duration_minutes = Some(601);
        assert!(draft.validate().is_err());
        draft.duration_minutes = Some(600);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn description_over_500_chars_is_rejected() {
        let mut draft = valid_draft();
        draft.description = Some("x".repeat(501));
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::TooLong { max: 500, .. })
        ));
    }

    #[test]
    fn content_type_defaults_when_empty() {
        let file = VideoFile::new("clip.mp4", "", vec![]);
        assert_eq!(file.content_type_or_default(), "application/octet-stream");
        let file = VideoFile::new("clip.mp4", "video/mp4", vec![]);
        assert_eq!(file.content_type_or_default(), "video/mp4");
    }
}
