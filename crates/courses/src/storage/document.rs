//! Whole-document JSON persistence.
//!
//! The collection is always read and written in full. Each write goes to
//! its own uniquely named temporary file beside the document and is renamed
//! into place, so a reader sees either the previous document or the new one
//! even when several writers share the file.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

use crate::course::CourseDocument;
use crate::error::{Error, Result};

/// Read and parse the document at `path`.
///
/// # Errors
///
/// Returns [`Error::DocumentRead`] if the file cannot be read and
/// [`Error::DocumentParse`] if it is not a course document.
pub fn read(path: &Path) -> Result<CourseDocument> {
    let data = fs::read_to_string(path).map_err(|source| Error::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document: CourseDocument =
        serde_json::from_str(&data).map_err(|source| Error::DocumentParse {
            path: path.to_path_buf(),
            source,
        })?;

    trace!(
        "Loaded {} courses from {}",
        document.courses.len(),
        path.display()
    );
    Ok(document)
}

/// Serialize `document` and replace the file at `path` with it.
///
/// # Errors
///
/// Returns [`Error::DocumentWrite`] if the temporary file cannot be written
/// or renamed over the document.
pub fn write(path: &Path, document: &CourseDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    let write_err = |source: std::io::Error| Error::DocumentWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    // Dropped without persisting on any error, which removes the file.
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    trace!(
        "Saved {} courses to {}",
        document.courses.len(),
        path.display()
    );
    Ok(())
}
