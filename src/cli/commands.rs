//! CLI command implementations
//!
//! Every command loads the config first. `exec` and `serve` refuse to run
//! against a data directory that `init` has not created.

use std::fs::{self, OpenOptions};
use std::path::Path;

use serde_json::json;
use uuid::Uuid;

use crate::library::LibraryService;
use crate::observability::{log_event, log_event_with_fields, Event, Logger};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{error_response, ok_response, read_request, read_requests, write_json};
use super::request::handle_request;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Exec { config } => exec(&config),
        Command::Serve { config } => serve(&config),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_level);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("data_dir", &config.data_dir),
            ("layout", config.layout.as_str()),
        ],
    );
    Ok(config)
}

/// Create the data directory and three empty store files
///
/// Fails if any store file already exists; existing data is never
/// truncated.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    let paths = config.store_paths();
    if paths.iter().any(|p| p.exists()) {
        return Err(CliError::already_initialized());
    }

    fs::create_dir_all(data_dir).map_err(|e| {
        CliError::io_error(format!("Failed to create directory {:?}: {}", data_dir, e))
    })?;

    for path in &paths {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| CliError::io_error(format!("Failed to create {:?}: {}", path, e)))?;
    }

    log_event_with_fields(Event::DataDirInitialized, &[("data_dir", &config.data_dir)]);
    write_json(&ok_response(json!({"initialized": true})))?;

    Ok(())
}

/// Execute one request from stdin
///
/// Domain errors are written as an error response and still exit 0.
pub fn exec(config_path: &Path) -> CliResult<()> {
    let service = open_service(config_path)?;

    let request = read_request()?;
    let request_id = Uuid::new_v4().to_string();
    let response = handle_request(&service, &request, &request_id);
    write_json(&response)?;

    Ok(())
}

/// Execute requests line by line until stdin closes
pub fn serve(config_path: &Path) -> CliResult<()> {
    let service = open_service(config_path)?;

    log_event(Event::Serving);

    for request_result in read_requests() {
        match request_result {
            Ok(request) => {
                let request_id = Uuid::new_v4().to_string();
                let response = handle_request(&service, &request, &request_id);
                write_json(&response)?;
            }
            Err(e) => {
                // I/O error reading stdin is fatal
                write_json(&error_response(e.code_str(), e.message()))?;
                return Err(e);
            }
        }
    }

    Ok(())
}

fn open_service(config_path: &Path) -> CliResult<LibraryService> {
    let config = load_config(config_path)?;

    if !is_initialized(config.data_path()) {
        return Err(CliError::not_initialized());
    }

    Ok(LibraryService::new(config.stores()))
}

fn is_initialized(data_dir: &Path) -> bool {
    data_dir.is_dir()
}
