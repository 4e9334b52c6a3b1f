//! CLI argument definitions using clap
//!
//! Commands:
//! - bookvault init --config <path>
//! - bookvault exec --config <path>
//! - bookvault serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bookvault - books, members and loans on flat record files
#[derive(Parser, Debug)]
#[command(name = "bookvault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and empty store files
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./bookvault.json")]
        config: PathBuf,
    },

    /// Execute one JSON request from stdin and exit
    Exec {
        /// Path to configuration file
        #[arg(long, default_value = "./bookvault.json")]
        config: PathBuf,
    },

    /// Execute line-delimited JSON requests from stdin until EOF
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./bookvault.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["bookvault", "exec"]).unwrap();
        match cli.command {
            Command::Exec { config } => assert_eq!(config, PathBuf::from("./bookvault.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_explicit_config_path() {
        let cli = Cli::try_parse_from(["bookvault", "serve", "--config", "/tmp/lib.json"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { config } if config == PathBuf::from("/tmp/lib.json")));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["bookvault", "start"]).is_err());
    }
}
