//! Operation handler for courses.
//!
//! Adapts parsed operation requests into store calls and maps every store
//! result, including persistence failures, onto an [`Outcome`]. Nothing
//! escapes this boundary as an error.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::course::{normalize_title, CourseId};
use crate::error::{Error, Result};
use crate::storage::CourseStore;

/// Payload returned when a title is missing or blank.
pub const TITLE_REQUIRED: &str = "Title is required";

/// Payload returned when an update or delete targets an absent id.
pub const COURSE_NOT_FOUND: &str = "Course not found";

/// Payload returned when the backing document cannot be used.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// A parsed request, as delivered by the external request layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// List courses, optionally filtered by a title substring.
    List {
        /// Case-insensitive title substring.
        title: Option<String>,
    },
    /// Get one course.
    Get {
        /// Course id.
        id: CourseId,
    },
    /// Create a course.
    Create {
        /// Raw title as received; validated by the handler.
        title: Option<String>,
    },
    /// Change the title of a course.
    Update {
        /// Course id.
        id: CourseId,
        /// Raw title as received; validated by the handler.
        title: Option<String>,
    },
    /// Delete a course.
    Delete {
        /// Course id.
        id: CourseId,
    },
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List { .. } => write!(f, "list"),
            Self::Get { id } => write!(f, "get {id}"),
            Self::Create { .. } => write!(f, "create"),
            Self::Update { id, .. } => write!(f, "update {id}"),
            Self::Delete { id } => write!(f, "delete {id}"),
        }
    }
}

/// Result code of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Success with a body.
    Ok,
    /// A record was created.
    Created,
    /// Success without a body.
    NoContent,
    /// The request was invalid.
    BadRequest,
    /// The requested record does not exist.
    NotFound,
    /// The store failed.
    InternalError,
}

impl Status {
    /// The HTTP status code for this result.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::InternalError => 500,
        }
    }

    /// Whether the operation succeeded.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created | Self::NoContent)
    }
}

/// What the external layer should send back.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Result code.
    pub status: Status,
    /// JSON payload, if any.
    pub body: Option<Value>,
}

impl Outcome {
    fn with_body(status: Status, body: &impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self {
                status,
                body: Some(value),
            },
            Err(e) => {
                error!("Failed to serialize response body: {}", e);
                Self::error(Status::InternalError, INTERNAL_ERROR)
            }
        }
    }

    fn empty(status: Status) -> Self {
        Self { status, body: None }
    }

    fn error(status: Status, message: &str) -> Self {
        Self {
            status,
            body: Some(json!({ "error": message })),
        }
    }
}

/// Stateless adapter between operation requests and a [`CourseStore`].
#[derive(Debug, Clone)]
pub struct Handler {
    store: Arc<dyn CourseStore>,
}

impl Handler {
    /// Create a handler over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    /// Run one operation to completion.
    #[must_use]
    pub fn handle(&self, operation: Operation) -> Outcome {
        debug!("Handling {}", operation);
        let label = operation.to_string();

        let result = match operation {
            Operation::List { title } => self.list(title.as_deref()),
            Operation::Get { id } => self.get(id),
            Operation::Create { title } => self.create(title.as_deref()),
            Operation::Update { id, title } => self.update(id, title.as_deref()),
            Operation::Delete { id } => self.delete(id),
        };

        result.unwrap_or_else(|err| {
            if err.is_persistence_failure() || matches!(err, Error::Internal(_)) {
                error!("{} failed: {}", label, err);
            } else {
                warn!("{} rejected: {}", label, err);
            }
            Self::failure(&err)
        })
    }

    fn list(&self, title: Option<&str>) -> Result<Outcome> {
        let filter = title.filter(|t| !t.is_empty());
        let courses = self.store.list(filter)?;
        Ok(Outcome::with_body(Status::Ok, &courses))
    }

    fn get(&self, id: CourseId) -> Result<Outcome> {
        match self.store.get(id) {
            Ok(course) => Ok(Outcome::with_body(Status::Ok, &course)),
            Err(Error::NotFound { .. }) => Ok(Outcome::empty(Status::NotFound)),
            Err(e) => Err(e),
        }
    }

    fn create(&self, title: Option<&str>) -> Result<Outcome> {
        let title = normalize_title(title)?;
        let course = self.store.insert(&title)?;
        Ok(Outcome::with_body(Status::Created, &course))
    }

    fn update(&self, id: CourseId, title: Option<&str>) -> Result<Outcome> {
        let title = normalize_title(title)?;
        let course = self.store.update(id, &title)?;
        Ok(Outcome::with_body(Status::Ok, &course))
    }

    fn delete(&self, id: CourseId) -> Result<Outcome> {
        self.store.delete(id)?;
        Ok(Outcome::empty(Status::NoContent))
    }

    fn failure(err: &Error) -> Outcome {
        match err {
            Error::InvalidTitle => Outcome::error(Status::BadRequest, TITLE_REQUIRED),
            Error::NotFound { .. } => Outcome::error(Status::NotFound, COURSE_NOT_FOUND),
            _ => Outcome::error(Status::InternalError, INTERNAL_ERROR),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::course::Course;
    use crate::storage::JsonFileStore;

    fn handler_with(json: &str) -> (TempDir, Handler) {
        crate::logging::init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.json");
        std::fs::write(&path, json).unwrap();
        let store = JsonFileStore::open(&path, false).unwrap();
        (dir, Handler::new(Arc::new(store)))
    }

    fn empty_handler() -> (TempDir, Handler) {
        handler_with(r#"{"courses": []}"#)
    }

    fn algebra_handler() -> (TempDir, Handler) {
        handler_with(r#"{"courses": [{"id": 1, "title": "Algebra"}]}"#)
    }

    fn list_all(handler: &Handler) -> Value {
        let outcome = handler.handle(Operation::List { title: None });
        assert_eq!(outcome.status, Status::Ok);
        outcome.body.unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Ok.code(), 200);
        assert_eq!(Status::Created.code(), 201);
        assert_eq!(Status::NoContent.code(), 204);
        assert_eq!(Status::BadRequest.code(), 400);
        assert_eq!(Status::NotFound.code(), 404);
        assert_eq!(Status::InternalError.code(), 500);
    }

    #[test]
    fn test_status_is_success() {
        assert!(Status::Created.is_success());
        assert!(Status::NoContent.is_success());
        assert!(!Status::NotFound.is_success());
        assert!(!Status::InternalError.is_success());
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Get { id: 3 }.to_string(), "get 3");
        assert_eq!(Operation::List { title: None }.to_string(), "list");
    }

    #[test]
    fn test_create_then_list() {
        let (_dir, handler) = empty_handler();

        let outcome = handler.handle(Operation::Create {
            title: Some("Algebra".to_string()),
        });
        assert_eq!(outcome.status, Status::Created);

        let created: Course = serde_json::from_value(outcome.body.unwrap()).unwrap();
        assert!(created.id > 0);
        assert_eq!(created.title, "Algebra");

        let listed: Vec<Course> = serde_json::from_value(list_all(&handler)).unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[test]
    fn test_create_blank_title() {
        let (_dir, handler) = algebra_handler();
        let before = list_all(&handler);

        for title in [None, Some(String::new()), Some("   ".to_string())] {
            let outcome = handler.handle(Operation::Create { title });
            assert_eq!(outcome.status, Status::BadRequest);
            assert_eq!(outcome.body, Some(json!({ "error": TITLE_REQUIRED })));
        }

        assert_eq!(list_all(&handler), before);
    }

    #[test]
    fn test_update_then_get() {
        let (_dir, handler) = algebra_handler();

        let outcome = handler.handle(Operation::Update {
            id: 1,
            title: Some("Calculus".to_string()),
        });
        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(outcome.body, Some(json!({ "id": 1, "title": "Calculus" })));

        let outcome = handler.handle(Operation::Get { id: 1 });
        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(outcome.body, Some(json!({ "id": 1, "title": "Calculus" })));
    }

    #[test]
    fn test_update_blank_title_is_checked_first() {
        let (_dir, handler) = algebra_handler();
        let outcome = handler.handle(Operation::Update {
            id: 404,
            title: Some(" ".to_string()),
        });
        assert_eq!(outcome.status, Status::BadRequest);
    }

    #[test]
    fn test_update_missing() {
        let (_dir, handler) = algebra_handler();
        let outcome = handler.handle(Operation::Update {
            id: 2,
            title: Some("Calculus".to_string()),
        });
        assert_eq!(outcome.status, Status::NotFound);
        assert_eq!(outcome.body, Some(json!({ "error": COURSE_NOT_FOUND })));
    }

    #[test]
    fn test_delete_twice() {
        let (_dir, handler) = algebra_handler();

        let outcome = handler.handle(Operation::Delete { id: 1 });
        assert_eq!(outcome, Outcome::empty(Status::NoContent));

        let outcome = handler.handle(Operation::Get { id: 1 });
        assert_eq!(outcome, Outcome::empty(Status::NotFound));

        let outcome = handler.handle(Operation::Delete { id: 1 });
        assert_eq!(outcome.status, Status::NotFound);
        assert_eq!(outcome.body, Some(json!({ "error": COURSE_NOT_FOUND })));
    }

    #[test]
    fn test_get_missing_has_no_body() {
        let (_dir, handler) = empty_handler();
        let outcome = handler.handle(Operation::Get { id: 1 });
        assert_eq!(outcome.status, Status::NotFound);
        assert!(outcome.body.is_none());
    }

    #[test]
    fn test_list_filter() {
        let (_dir, handler) = handler_with(
            r#"{"courses": [{"id": 1, "title": "Algebra"}, {"id": 2, "title": "Biology"}]}"#,
        );
        let outcome = handler.handle(Operation::List {
            title: Some("BIO".to_string()),
        });
        assert_eq!(outcome.status, Status::Ok);
        assert_eq!(outcome.body, Some(json!([{ "id": 2, "title": "Biology" }])));
    }

    #[test]
    fn test_list_empty_filter_lists_everything() {
        let (_dir, handler) = handler_with(
            r#"{"courses": [{"id": 1, "title": "Algebra"}, {"id": 2, "title": "Biology"}]}"#,
        );
        let outcome = handler.handle(Operation::List {
            title: Some(String::new()),
        });
        assert_eq!(outcome.body.unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_persistence_failure_maps_to_internal_error() {
        let (_dir, handler) = handler_with("{ broken");

        for operation in [
            Operation::List { title: None },
            Operation::Get { id: 1 },
            Operation::Create {
                title: Some("Algebra".to_string()),
            },
            Operation::Update {
                id: 1,
                title: Some("Algebra".to_string()),
            },
            Operation::Delete { id: 1 },
        ] {
            let outcome = handler.handle(operation);
            assert_eq!(outcome.status, Status::InternalError);
            assert_eq!(outcome.body, Some(json!({ "error": INTERNAL_ERROR })));
        }
    }

    #[test]
    fn test_missing_document_maps_to_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("gone.json"), false).unwrap();
        let handler = Handler::new(Arc::new(store));

        let outcome = handler.handle(Operation::List { title: None });
        assert_eq!(outcome.status, Status::InternalError);
    }

    #[test]
    fn test_exhausted_ids_map_to_internal_error() {
        let (_dir, handler) =
            handler_with(r#"{"courses": [{"id": 9223372036854775807, "title": "Last"}]}"#);

        let outcome = handler.handle(Operation::Create {
            title: Some("Next".to_string()),
        });
        assert_eq!(outcome.status, Status::InternalError);
        assert_eq!(outcome.body, Some(json!({ "error": INTERNAL_ERROR })));

        let listed = handler.handle(Operation::List { title: None });
        assert_eq!(listed.body.unwrap().as_array().unwrap().len(), 1);
    }
}
