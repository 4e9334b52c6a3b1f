//! Crash point injection for exercising the multi-file write window
//!
//! Borrow and return each touch two or three store files with independent
//! writes. There is no transaction across files, so a crash between writes
//! leaves them disagreeing (e.g. a loan marked borrowed while the book's
//! `borrowed` counter was never incremented). Crash points make that window
//! reproducible.
//!
//! When `BOOKVAULT_CRASH_POINT` names a point, reaching it terminates the
//! process via `std::process::abort()`: no cleanup, no unwinding.
//!
//! ```bash
//! BOOKVAULT_CRASH_POINT=borrow_after_loan_append bookvault exec --config bookvault.json
//! ```

use std::sync::OnceLock;

/// Environment variable that selects the active crash point
pub const CRASH_POINT_ENV: &str = "BOOKVAULT_CRASH_POINT";

static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

#[inline]
fn get_crash_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var(CRASH_POINT_ENV).ok())
        .as_deref()
}

/// Returns true if `BOOKVAULT_CRASH_POINT` equals `name`.
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    get_crash_point().map(|p| p == name).unwrap_or(false)
}

/// Aborts the process if the named crash point is enabled; no-op otherwise.
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        eprintln!("[CRASH] Triggering crash at point: {}", name);
        std::process::abort();
    }
}

/// All defined crash point names
pub mod points {
    /// Loan appended; book and member counters not yet rewritten
    pub const BORROW_AFTER_LOAN_APPEND: &str = "borrow_after_loan_append";
    /// Book counter rewritten; member counter not yet rewritten
    pub const BORROW_AFTER_BOOK_REWRITE: &str = "borrow_after_book_rewrite";
    /// Loan marked returned; book counter not yet rewritten
    pub const RETURN_AFTER_LOAN_REWRITE: &str = "return_after_loan_rewrite";

    /// Get all crash point names
    pub fn all() -> &'static [&'static str] {
        &[
            BORROW_AFTER_LOAN_APPEND,
            BORROW_AFTER_BOOK_REWRITE,
            RETURN_AFTER_LOAN_REWRITE,
        ]
    }
}
