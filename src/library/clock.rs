//! Source of "today" for loan and report dates

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Date format stored in loan records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format used on reports
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Supplies the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Today as `YYYY-MM-DD`.
    fn today(&self) -> String {
        self.now().format(DATE_FORMAT).to_string()
    }
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Midnight of the given date. Returns `None` for an impossible date.
    pub fn on(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
