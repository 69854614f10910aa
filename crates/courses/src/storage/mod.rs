//! Storage layer for courses.
//!
//! This module provides the record store: the single owner of the course
//! collection and its persisted JSON document. Every operation loads the
//! whole document fresh, acts on it, and (for mutations) writes it back in
//! full. Nothing is cached between calls except the id watermark.

pub mod document;
pub mod ids;

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::course::{normalize_title, Course, CourseDocument, CourseId};
use crate::error::{Error, Result};

use self::ids::IdGenerator;

/// Operations every course store provides.
///
/// Implementations must make each mutation atomic with respect to the
/// others, and must never let a reader observe a partially written
/// collection.
pub trait CourseStore: Send + Sync + std::fmt::Debug {
    /// List courses in collection order, optionally keeping only those whose
    /// title contains `filter` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be loaded.
    fn list(&self, filter: Option<&str>) -> Result<Vec<Course>>;

    /// Get the course with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no course has this id, or an error if
    /// the collection cannot be loaded.
    fn get(&self, id: CourseId) -> Result<Course>;

    /// Append a new course and return it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTitle`] for a blank title, or an error if the
    /// collection cannot be loaded or saved.
    fn insert(&self, title: &str) -> Result<Course>;

    /// Replace the title of an existing course and return it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTitle`], [`Error::NotFound`], or an error if
    /// the collection cannot be loaded or saved.
    fn update(&self, id: CourseId, title: &str) -> Result<Course>;

    /// Remove a course.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no course has this id, or an error if
    /// the collection cannot be loaded or saved.
    fn delete(&self, id: CourseId) -> Result<()>;
}

/// Course store backed by a single JSON document on disk.
///
/// Reads share a lock and may run concurrently. Mutations hold the lock
/// exclusively across their whole load-mutate-save sequence, so concurrent
/// writers in this process cannot lose each other's updates.
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path to the document.
    path: PathBuf,
    /// Guards the document; the write side also owns id assignment.
    ids: RwLock<IdGenerator>,
}

impl JsonFileStore {
    /// Open the store for the document at `path`.
    ///
    /// With `initialize` set, a missing document is created empty (along
    /// with its parent directories). Otherwise a missing document is left
    /// alone and reported by the first operation that needs it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the empty document cannot be
    /// created.
    pub fn open(path: impl AsRef<Path>, initialize: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if initialize && !path.exists() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
            document::write(&path, &CourseDocument::default())?;
            info!("Created empty course document at {}", path.display());
        }

        debug!("Using course document at {}", path.display());
        Ok(Self {
            path,
            ids: RwLock::new(IdGenerator::default()),
        })
    }

    /// Get the path to the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, IdGenerator>> {
        self.ids
            .read()
            .map_err(|_| Error::internal("course document lock poisoned"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, IdGenerator>> {
        self.ids
            .write()
            .map_err(|_| Error::internal("course document lock poisoned"))
    }
}

impl CourseStore for JsonFileStore {
    fn list(&self, filter: Option<&str>) -> Result<Vec<Course>> {
        let _guard = self.read_lock()?;
        let mut courses = document::read(&self.path)?.courses;

        if let Some(needle) = filter {
            courses.retain(|c| c.title_matches(needle));
        }

        debug!("Listed {} courses (filter: {:?})", courses.len(), filter);
        Ok(courses)
    }

    fn get(&self, id: CourseId) -> Result<Course> {
        let _guard = self.read_lock()?;
        document::read(&self.path)?
            .courses
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found(id))
    }

    fn insert(&self, title: &str) -> Result<Course> {
        let title = normalize_title(Some(title))?;
        let mut ids = self.write_lock()?;
        let mut doc = document::read(&self.path)?;

        let course = Course::new(ids.next(&doc)?, title);
        doc.courses.push(course.clone());
        document::write(&self.path, &doc)?;

        debug!("Inserted course with id {}", course.id);
        Ok(course)
    }

    fn update(&self, id: CourseId, title: &str) -> Result<Course> {
        let title = normalize_title(Some(title))?;
        let _guard = self.write_lock()?;
        let mut doc = document::read(&self.path)?;

        let index = doc.position(id).ok_or_else(|| Error::not_found(id))?;
        doc.courses[index].title = title;
        let course = doc.courses[index].clone();
        document::write(&self.path, &doc)?;

        debug!("Updated course with id {}", id);
        Ok(course)
    }

    fn delete(&self, id: CourseId) -> Result<()> {
        let _guard = self.write_lock()?;
        let mut doc = document::read(&self.path)?;

        let index = doc.position(id).ok_or_else(|| Error::not_found(id))?;
        doc.courses.remove(index);
        document::write(&self.path, &doc)?;

        debug!("Deleted course with id {}", id);
        Ok(())
    }
}
