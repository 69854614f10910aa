//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::course::CourseId;
use crate::handler::Operation;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind (overrides configuration)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides configuration)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show courses whose title contains this text (case-insensitive)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Get command arguments.
#[derive(Debug, Args)]
pub struct GetCommand {
    /// Course id
    #[arg(allow_negative_numbers = true)]
    pub id: CourseId,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Create command arguments.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Title of the new course
    pub title: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Update command arguments.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Course id
    #[arg(allow_negative_numbers = true)]
    pub id: CourseId,

    /// New title
    pub title: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Course id
    #[arg(allow_negative_numbers = true)]
    pub id: CourseId,
}

impl From<&ListCommand> for Operation {
    fn from(cmd: &ListCommand) -> Self {
        Self::List {
            title: cmd.title.clone(),
        }
    }
}

impl From<&GetCommand> for Operation {
    fn from(cmd: &GetCommand) -> Self {
        Self::Get { id: cmd.id }
    }
}

impl From<&CreateCommand> for Operation {
    fn from(cmd: &CreateCommand) -> Self {
        Self::Create {
            title: Some(cmd.title.clone()),
        }
    }
}

impl From<&UpdateCommand> for Operation {
    fn from(cmd: &UpdateCommand) -> Self {
        Self::Update {
            id: cmd.id,
            title: Some(cmd.title.clone()),
        }
    }
}

impl From<&DeleteCommand> for Operation {
    fn from(cmd: &DeleteCommand) -> Self {
        Self::Delete { id: cmd.id }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One course per line
    #[default]
    Table,
    /// JSON output
    Json,
}
