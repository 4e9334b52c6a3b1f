//! Observability for bookvault
//!
//! Structured JSON log lines for store activity, domain changes and CLI
//! requests. Logging is synchronous, has no side effects on the operation
//! being logged, and never fails it.
//!
//! ```ignore
//! use bookvault::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::BookAdded, &[("book_id", "12")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
