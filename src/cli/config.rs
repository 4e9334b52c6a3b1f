//! Configuration file
//!
//! ```json
//! { "data_dir": "./library", "layout": "packed", "log_level": "info" }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::library::{LibraryStores, BOOKS_FILE, LOANS_FILE, MEMBERS_FILE};
use crate::observability::Severity;
use crate::storage::{Layout, RecordStore};

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the three store files (required)
    pub data_dir: String,

    #[serde(default = "default_books_file")]
    pub books_file: String,

    #[serde(default = "default_members_file")]
    pub members_file: String,

    #[serde(default = "default_loans_file")]
    pub loans_file: String,

    /// Block layout: "packed" or "aligned"
    #[serde(default)]
    pub layout: Layout,

    /// Lowest log severity written to stderr
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_books_file() -> String {
    BOOKS_FILE.to_string()
}
fn default_members_file() -> String {
    MEMBERS_FILE.to_string()
}
fn default_loans_file() -> String {
    LOANS_FILE.to_string()
}
fn default_log_level() -> Severity {
    Severity::Info
}

impl Config {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        let files = [
            ("books_file", &self.books_file),
            ("members_file", &self.members_file),
            ("loans_file", &self.loans_file),
        ];
        for (key, name) in files {
            let is_plain = Path::new(name.as_str())
                .file_name()
                .map_or(false, |f| f == name.as_str());
            if name.is_empty() || !is_plain {
                return Err(CliError::config_error(format!(
                    "{} must be a plain file name, got '{}'",
                    key, name
                )));
            }
        }

        if self.books_file == self.members_file
            || self.books_file == self.loans_file
            || self.members_file == self.loans_file
        {
            return Err(CliError::config_error(
                "books_file, members_file and loans_file must be distinct",
            ));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Full paths of the three store files
    pub fn store_paths(&self) -> [PathBuf; 3] {
        let dir = self.data_path();
        [
            dir.join(&self.books_file),
            dir.join(&self.members_file),
            dir.join(&self.loans_file),
        ]
    }

    /// One store per entity kind, as configured
    pub fn stores(&self) -> LibraryStores {
        let [books, members, loans] = self.store_paths();
        LibraryStores::new(
            RecordStore::new(books, self.layout),
            RecordStore::new(members, self.layout),
            RecordStore::new(loans, self.layout),
        )
    }
}
