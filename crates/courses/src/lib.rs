//! `courses` - a small course catalogue persisted as one JSON document
//!
//! This library provides the record store that owns the course collection,
//! the operation handler that turns requests into store calls and result
//! codes, and the HTTP front end that serves them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod course;
pub mod error;
pub mod handler;
pub mod logging;
pub mod server;
pub mod storage;

pub use config::Config;
pub use course::{Course, CourseDocument, CourseId};
pub use error::{Error, Result};
pub use handler::{Handler, Operation, Outcome, Status};
pub use logging::init_logging;
pub use storage::{CourseStore, JsonFileStore};
