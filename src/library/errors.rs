//! Domain error types
//!
//! Every variant except `Storage` is a recoverable validation outcome handed
//! back to the caller; none of them terminate the process.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for library operations
pub type LibraryResult<T> = Result<T, LibraryError>;

/// Failures of library operations
#[derive(Debug, Error)]
pub enum LibraryError {
    /// A book with this id already exists (active or inactive)
    #[error("Book id {0} already exists")]
    DuplicateId(i32),

    /// No record with this id
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i32 },

    /// The book is already inactive
    #[error("Book {0} has already been deleted")]
    AlreadyDeleted(i32),

    /// Deletion blocked by open loans referencing the book
    #[error("Book {book_id} is currently borrowed ({open_loans} open loan(s))")]
    Conflict { book_id: i32, open_loans: usize },

    /// Book missing or inactive at borrow time
    #[error("Book {0} is not available")]
    BookUnavailable(i32),

    /// Member missing or blocked at borrow time
    #[error("Member {0} is not valid")]
    MemberInvalid(i32),

    /// Every copy of the book is out
    #[error("No available copies of book {0}")]
    NoCopiesAvailable(i32),

    /// No loan with this id is currently borrowed
    #[error("Active loan {0} not found")]
    ActiveLoanNotFound(i32),

    /// Input would break a record invariant
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Underlying store failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LibraryError {
    pub(crate) fn not_found(kind: &'static str, id: i32) -> Self {
        LibraryError::NotFound { kind, id }
    }

    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            LibraryError::DuplicateId(_) => "BOOKVAULT_DUPLICATE_ID",
            LibraryError::NotFound { .. } => "BOOKVAULT_NOT_FOUND",
            LibraryError::AlreadyDeleted(_) => "BOOKVAULT_ALREADY_DELETED",
            LibraryError::Conflict { .. } => "BOOKVAULT_CONFLICT",
            LibraryError::BookUnavailable(_) => "BOOKVAULT_BOOK_UNAVAILABLE",
            LibraryError::MemberInvalid(_) => "BOOKVAULT_MEMBER_INVALID",
            LibraryError::NoCopiesAvailable(_) => "BOOKVAULT_NO_COPIES_AVAILABLE",
            LibraryError::ActiveLoanNotFound(_) => "BOOKVAULT_ACTIVE_LOAN_NOT_FOUND",
            LibraryError::InvalidInput(_) => "BOOKVAULT_INVALID_INPUT",
            LibraryError::Storage(e) => e.code().code(),
        }
    }

    /// True for validation outcomes; false for store failures.
    pub fn is_validation(&self) -> bool {
        !matches!(self, LibraryError::Storage(_))
    }
}
