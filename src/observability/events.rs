//! Observable events
//!
//! Events are explicit and typed; each maps to a fixed uppercase name and a
//! default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in bookvault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// Data directory created
    DataDirInitialized,

    // Store operations
    /// Full collection read from disk
    StoreLoaded,
    /// Full collection rewritten
    StoreRewritten,
    /// One record appended
    StoreAppended,
    /// Partial trailing block ignored or cut off
    StoreTruncatedTail,
    /// A full block failed to decode
    StoreCorruption,

    // Books
    BookAdded,
    BookUpdated,
    BookDeleted,

    // Members
    MemberAdded,
    MemberUpdated,
    MemberBlocked,

    // Loans
    LoanOpened,
    LoanReturned,

    // Reporting
    ReportGenerated,

    // Requests
    /// Request received by the CLI
    RequestReceived,
    /// Request completed
    RequestCompleted,
    /// Request rejected by validation
    RequestRejected,
    /// Serve loop ready for input
    Serving,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataDirInitialized => "DATA_DIR_INITIALIZED",

            Event::StoreLoaded => "STORE_LOADED",
            Event::StoreRewritten => "STORE_REWRITTEN",
            Event::StoreAppended => "STORE_APPENDED",
            Event::StoreTruncatedTail => "STORE_TRUNCATED_TAIL",
            Event::StoreCorruption => "STORE_CORRUPTION",

            Event::BookAdded => "BOOK_ADDED",
            Event::BookUpdated => "BOOK_UPDATED",
            Event::BookDeleted => "BOOK_DELETED",

            Event::MemberAdded => "MEMBER_ADDED",
            Event::MemberUpdated => "MEMBER_UPDATED",
            Event::MemberBlocked => "MEMBER_BLOCKED",

            Event::LoanOpened => "LOAN_OPENED",
            Event::LoanReturned => "LOAN_RETURNED",

            Event::ReportGenerated => "REPORT_GENERATED",

            Event::RequestReceived => "REQUEST_RECEIVED",
            Event::RequestCompleted => "REQUEST_COMPLETED",
            Event::RequestRejected => "REQUEST_REJECTED",
            Event::Serving => "BOOKVAULT_SERVING",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreLoaded
            | Event::StoreRewritten
            | Event::StoreAppended
            | Event::RequestReceived => Severity::Trace,
            Event::StoreTruncatedTail | Event::RequestRejected => Severity::Warn,
            Event::StoreCorruption => Severity::Fatal,
            _ => Severity::Info,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::DataDirInitialized,
            Event::StoreLoaded,
            Event::StoreRewritten,
            Event::StoreAppended,
            Event::StoreTruncatedTail,
            Event::StoreCorruption,
            Event::BookAdded,
            Event::BookUpdated,
            Event::BookDeleted,
            Event::MemberAdded,
            Event::MemberUpdated,
            Event::MemberBlocked,
            Event::LoanOpened,
            Event::LoanReturned,
            Event::ReportGenerated,
            Event::RequestReceived,
            Event::RequestCompleted,
            Event::RequestRejected,
            Event::Serving,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_severities() {
        assert!(Event::StoreCorruption.is_fatal());
        assert_eq!(Event::StoreTruncatedTail.severity(), Severity::Warn);
        assert_eq!(Event::StoreRewritten.severity(), Severity::Trace);
        assert_eq!(Event::LoanOpened.severity(), Severity::Info);
        assert!(!Event::BookDeleted.is_fatal());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::LoanReturned), "LOAN_RETURNED");
    }
}
