//! Storage error types
//!
//! Error codes:
//! - BOOKVAULT_STORAGE_IO_ERROR (ERROR severity)
//! - BOOKVAULT_STORAGE_WRITE_FAILED (ERROR severity)
//! - BOOKVAULT_STORAGE_READ_FAILED (ERROR severity)
//! - BOOKVAULT_DATA_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;
use std::path::Path;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, process continues
    Error,
    /// The store cannot be trusted until repaired
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure outside a read or write of records
    BookvaultStorageIoError,
    /// Record write failed
    BookvaultStorageWriteFailed,
    /// Record read failed
    BookvaultStorageReadFailed,
    /// A full block could not be decoded
    BookvaultDataCorruption,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::BookvaultStorageIoError => "BOOKVAULT_STORAGE_IO_ERROR",
            StorageErrorCode::BookvaultStorageWriteFailed => "BOOKVAULT_STORAGE_WRITE_FAILED",
            StorageErrorCode::BookvaultStorageReadFailed => "BOOKVAULT_STORAGE_READ_FAILED",
            StorageErrorCode::BookvaultDataCorruption => "BOOKVAULT_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::BookvaultStorageIoError => Severity::Error,
            StorageErrorCode::BookvaultStorageWriteFailed => Severity::Error,
            StorageErrorCode::BookvaultStorageReadFailed => Severity::Error,
            StorageErrorCode::BookvaultDataCorruption => Severity::Fatal,
        }
    }
}

/// Storage error type with code, message, optional context and io source
#[derive(Debug)]
pub struct StorageError {
    /// Error code
    code: StorageErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl StorageError {
    /// Create a new storage I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::BookvaultStorageIoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new storage write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::BookvaultStorageWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new storage read failed error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::BookvaultStorageReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a data corruption error for a block at `offset` in `path`
    pub fn corruption_at_offset(path: &Path, offset: u64, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::BookvaultDataCorruption,
            message: reason.into(),
            details: Some(format!("file: {}, byte_offset: {}", path.display(), offset)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns whether this error means the file contents cannot be trusted
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
