//! CLI module for bookvault
//!
//! Provides command-line interface for:
//! - init: Create the data directory and empty store files
//! - exec: One-shot request execution
//! - serve: Line-delimited request loop over stdin/stdout

mod args;
mod commands;
mod config;
mod errors;
mod io;
mod request;

pub use args::{Cli, Command};
pub use commands::{exec, init, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_response, ok_response, read_request, read_requests, write_json};
pub use request::{handle_request, Request};
