//! Course entity and its input draft.

use chrono::{DateTime, Utc};
use common::CourseId;
use serde::{Deserialize, Serialize};

use crate::error::{self, ValidationError};

/// Course difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Returns the difficulty name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Parses a difficulty from its display name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Beginner" => Some(Difficulty::Beginner),
            "Intermediate" => Some(Difficulty::Intermediate),
            "Advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input fields for a course that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDraft {
    /// Course title, 1–200 characters.
    pub title: String,

    /// Optional description, at most 1000 characters.
    pub description: Option<String>,

    /// Optional instructor name, at most 100 characters.
    pub instructor_name: Option<String>,

    /// Optional total duration in hours, 1–1000.
    pub duration_hours: Option<u32>,

    /// Optional difficulty level.
    pub difficulty: Option<Difficulty>,
}

impl CourseDraft {
    /// Creates a draft with only the required title set.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            instructor_name: None,
            duration_hours: None,
            difficulty: None,
        }
    }

    /// Checks all field constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        error::required_text("course title", &self.title, 200)?;
        error::optional_text("course description", self.description.as_deref(), 1000)?;
        error::optional_text("instructor name", self.instructor_name.as_deref(), 100)?;
        error::optional_range("duration_hours", self.duration_hours, 1, 1000)?;
        Ok(())
    }
}

/// A persisted course.
///
/// Owned by the relational store; the creation saga holds a reference to one
/// only for the duration of the flow and for compensation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub instructor_name: Option<String>,
    pub duration_hours: Option<u32>,
    pub difficulty: Option<Difficulty>,
    /// Optional cover image address; not written by the creation saga.
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Materializes a draft into a persisted course at the given instant.
    ///
    /// Intended for store implementations; the id and timestamps are
    /// server-assigned.
    pub fn from_draft(id: CourseId, draft: &CourseDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            instructor_name: draft.instructor_name.clone(),
            duration_hours: draft.duration_hours,
            difficulty: draft.difficulty,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}
