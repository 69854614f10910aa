//! Course id assignment.

use chrono::Utc;

use crate::course::{CourseDocument, CourseId};
use crate::error::{Error, Result};

/// Issues clock-derived course ids that never repeat.
///
/// An id is the current time in milliseconds since the Unix epoch, raised
/// when necessary to one past the larger of the highest id in the loaded
/// collection and the last id this generator handed out. Two inserts in the
/// same millisecond, or after the clock steps backwards, still get distinct
/// ids. Once the id space above the collection is used up, no further id
/// is issued.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_issued: CourseId,
}

impl IdGenerator {
    /// Issue the next id for a course appended to `document`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the collection or this generator
    /// already holds the largest representable id.
    pub fn next(&mut self, document: &CourseDocument) -> Result<CourseId> {
        self.next_at(Utc::now().timestamp_millis(), document)
    }

    fn next_at(&mut self, now_millis: CourseId, document: &CourseDocument) -> Result<CourseId> {
        let floor = document.max_id().unwrap_or(0).max(self.last_issued);
        let above = floor
            .checked_add(1)
            .ok_or_else(|| Error::internal("course id space exhausted"))?;
        let id = now_millis.max(above);
        self.last_issued = id;
        Ok(id)
    }
}
