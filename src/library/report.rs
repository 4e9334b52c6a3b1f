//! Inventory summary
//!
//! Read-only join of all three stores. Only active books are reported.

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

use super::clock::REPORT_TIMESTAMP_FORMAT;
use super::errors::LibraryResult;
use super::loans::placeholder_member_name;
use super::service::LibraryService;

/// One active book in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub copies: i32,
    pub borrowed: i32,
    pub available: i32,
    /// Number of loans referencing this book that are still `Borrowed`
    pub open_loans: usize,
    /// Borrower names of the open loans, in loan order
    pub borrowers: Vec<String>,
}

impl ReportRow {
    /// Whether the book's counter agrees with its open loans.
    ///
    /// Disagreement means a borrow or return was interrupted between its
    /// file writes.
    pub fn is_consistent(&self) -> bool {
        usize::try_from(self.borrowed).map_or(false, |b| b == self.open_loans)
    }
}

/// Totals over active books.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryTotals {
    pub titles: usize,
    pub copies: i64,
    pub borrowed: i64,
    pub available: i64,
}

/// The full summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// `YYYY-MM-DD HH:MM`
    pub generated_at: String,
    pub rows: Vec<ReportRow>,
    pub totals: InventoryTotals,
}

impl LibraryService {
    pub fn generate_summary_report(&self) -> LibraryResult<SummaryReport> {
        let books = self.stores.books.load_all()?;
        let members = self.stores.members.load_all()?;
        let loans = self.stores.loans.load_all()?;

        let mut totals = InventoryTotals::default();
        let mut rows = Vec::new();

        for book in books.iter().filter(|b| b.is_active()) {
            let borrowers: Vec<String> = loans
                .iter()
                .filter(|l| l.book_id == book.book_id && l.is_open())
                .map(|l| {
                    members
                        .iter()
                        .find(|m| m.member_id == l.member_id)
                        .map(|m| m.name.clone())
                        .unwrap_or_else(|| placeholder_member_name(l.member_id))
                })
                .collect();

            totals.titles += 1;
            totals.copies += i64::from(book.copies);
            totals.borrowed += i64::from(book.borrowed);

            rows.push(ReportRow {
                book_id: book.book_id,
                title: book.title.clone(),
                author: book.author.clone(),
                year: book.year,
                copies: book.copies,
                borrowed: book.borrowed,
                available: book.available(),
                open_loans: borrowers.len(),
                borrowers,
            });
        }
        totals.available = totals.copies - totals.borrowed;

        log_event_with_fields(
            Event::ReportGenerated,
            &[("titles", &totals.titles.to_string())],
        );

        Ok(SummaryReport {
            generated_at: self.clock.now().format(REPORT_TIMESTAMP_FORMAT).to_string(),
            rows,
            totals,
        })
    }
}
