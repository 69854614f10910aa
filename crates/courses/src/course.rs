//! Core record types for courses.
//!
//! This module defines the course record and the document shape it is
//! persisted in.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a course, unique within the collection.
pub type CourseId = i64;

/// A single course record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Identifier assigned at creation time. Never changes afterwards.
    pub id: CourseId,

    /// Trimmed, non-empty title. The only mutable field.
    pub title: String,
}

impl Course {
    /// Create a course with an already assigned id and a validated title.
    #[must_use]
    pub fn new(id: CourseId, title: String) -> Self {
        Self { id, title }
    }

    /// Check whether the title contains `needle`, ignoring case.
    #[must_use]
    pub fn title_matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// The persisted document: the full collection under one named field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDocument {
    /// All courses in insertion order.
    pub courses: Vec<Course>,
}

impl CourseDocument {
    /// Find the position of the course with the given id.
    #[must_use]
    pub fn position(&self, id: CourseId) -> Option<usize> {
        self.courses.iter().position(|c| c.id == id)
    }

    /// Largest id currently in the collection.
    #[must_use]
    pub fn max_id(&self) -> Option<CourseId> {
        self.courses.iter().map(|c| c.id).max()
    }
}

/// Validate a raw title and return its trimmed form.
///
/// # Errors
///
/// Returns [`Error::InvalidTitle`] if the title is absent or blank.
pub fn normalize_title(raw: Option<&str>) -> Result<String> {
    match raw.map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(Error::InvalidTitle),
    }
}
