//! Command-line interface for courses.
//!
//! This module provides the CLI structure for the `courses` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, CreateCommand, DeleteCommand, GetCommand, ListCommand, OutputFormat,
    ServeCommand, UpdateCommand,
};

/// courses - a small course catalogue kept in one JSON document
///
/// Serves the catalogue over HTTP, or reads and edits it directly.
#[derive(Debug, Parser)]
#[command(name = "courses")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the course document (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub document: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the course API over HTTP
    Serve(ServeCommand),

    /// List courses
    List(ListCommand),

    /// Show one course
    Get(GetCommand),

    /// Create a course
    Create(CreateCommand),

    /// Change the title of a course
    Update(UpdateCommand),

    /// Delete a course
    Delete(DeleteCommand),

    /// Create an empty course document if none exists
    Init,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
