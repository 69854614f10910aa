//! `courses` - CLI for the course catalogue
//!
//! This binary serves the course API over HTTP and runs single operations
//! against the course document from the shell.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use courses::cli::{Cli, Command, ConfigCommand, OutputFormat, ServeCommand};
use courses::{init_logging, Config, Course, Handler, JsonFileStore, Operation, Status};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    if let Some(document) = &cli.document {
        config.storage.document_path = Some(document.clone());
    }

    // Execute the command
    match &cli.command {
        Command::Serve(cmd) => handle_serve(config, cmd),
        Command::List(cmd) => run(&config, cmd.into(), cmd.format),
        Command::Get(cmd) => run(&config, cmd.into(), cmd.format),
        Command::Create(cmd) => run(&config, cmd.into(), cmd.format),
        Command::Update(cmd) => run(&config, cmd.into(), cmd.format),
        Command::Delete(cmd) => run(&config, cmd.into(), OutputFormat::Table),
        Command::Init => handle_init(&config),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_handler(config: &Config) -> anyhow::Result<Handler> {
    let path = config.document_path();
    let store = JsonFileStore::open(&path, config.storage.initialize)
        .with_context(|| format!("opening course document {}", path.display()))?;
    Ok(Handler::new(Arc::new(store)))
}

fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = &cmd.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;

    let handler = open_handler(&config)?;
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(courses::server::serve(&config, handler))?;
    Ok(())
}

fn run(config: &Config, operation: Operation, format: OutputFormat) -> anyhow::Result<()> {
    let handler = open_handler(config)?;
    let outcome = handler.handle(operation);

    if !outcome.status.is_success() {
        let message = outcome
            .body
            .as_ref()
            .and_then(|body| body.get("error"))
            .and_then(|e| e.as_str())
            .unwrap_or("Course not found");
        bail!("{message} ({})", outcome.status.code());
    }

    let Some(body) = outcome.body else {
        if outcome.status == Status::NoContent {
            println!("Deleted.");
        }
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
        OutputFormat::Table => {
            let courses: Vec<Course> = if body.is_array() {
                serde_json::from_value(body)?
            } else {
                vec![serde_json::from_value(body)?]
            };
            if courses.is_empty() {
                println!("No courses.");
            }
            for course in courses {
                println!("{:>15}  {}", course.id, course.title);
            }
        }
    }
    Ok(())
}

fn handle_init(config: &Config) -> anyhow::Result<()> {
    let path = config.document_path();
    let existed = path.exists();
    JsonFileStore::open(&path, true)
        .with_context(|| format!("creating course document {}", path.display()))?;

    if existed {
        println!("Course document already exists at {}", path.display());
    } else {
        println!("Created course document at {}", path.display());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Document path:      {}", config.document_path().display());
                println!("  Initialize:         {}", config.storage.initialize);
                println!();
                println!("[Server]");
                println!("  Address:            {}", config.socket_addr());
                if config.server.cors_origins.is_empty() {
                    println!("  CORS origins:       any");
                } else {
                    println!(
                        "  CORS origins:       {}",
                        config.server.cors_origins.join(", ")
                    );
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
