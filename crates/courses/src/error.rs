//! Error types for courses.
//!
//! This module defines all error types used throughout the courses crate.
//! The three kinds surfaced by the record core are a rejected title, an
//! absent id, and a persistence failure against the backing document.

use std::path::PathBuf;
use thiserror::Error;

use crate::course::CourseId;

/// The main error type for courses operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// The title was missing or blank after trimming.
    #[error("title is required")]
    InvalidTitle,

    /// No course with the requested id exists.
    #[error("course {id} not found")]
    NotFound {
        /// The id that was looked up.
        id: CourseId,
    },

    // === Persistence Errors ===
    /// Failed to read the backing document.
    #[error("failed to read document at {path}: {source}")]
    DocumentRead {
        /// Path to the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write or replace the backing document.
    #[error("failed to write document at {path}: {source}")]
    DocumentWrite {
        /// Path to the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The backing document is not a valid course document.
    #[error("malformed document at {path}: {source}")]
    DocumentParse {
        /// Path to the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// The HTTP server could not bind or stopped with an error.
    #[error("server error on {addr}: {source}")]
    Server {
        /// Address the server was bound to.
        addr: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for courses operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a not-found error for the given id.
    #[must_use]
    pub fn not_found(id: CourseId) -> Self {
        Self::NotFound { id }
    }

    /// Check if this error indicates a missing course.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a rejected title.
    #[must_use]
    pub fn is_invalid_title(&self) -> bool {
        matches!(self, Self::InvalidTitle)
    }

    /// Check if the backing document could not be read, parsed or written.
    #[must_use]
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            Self::DocumentRead { .. }
                | Self::DocumentWrite { .. }
                | Self::DocumentParse { .. }
                | Self::DirectoryCreate { .. }
                | Self::Json(_)
        )
    }
}
