//! Library domain: books, members, loans
//!
//! `LibraryService` owns one `RecordStore` per entity kind and implements
//! every business rule on top of them:
//!
//! - Book ids are caller-supplied and unique; member and loan ids are
//!   allocated as `max + 1`
//! - Deletion is a status flip; rows and ids survive forever
//! - A book with open loans cannot be deleted
//! - `0 <= borrowed <= copies` for every book
//! - Loans move `Borrowed -> Returned` exactly once
//!
//! There is no transaction across the three files. See `loans` for the
//! crash window this leaves.

mod books;
mod clock;
mod errors;
mod loans;
mod members;
mod report;
mod service;

pub use books::{BookUpdate, NewBook};
pub use clock::{Clock, FixedClock, SystemClock, DATE_FORMAT, REPORT_TIMESTAMP_FORMAT};
pub use errors::{LibraryError, LibraryResult};
pub use loans::{placeholder_book_title, placeholder_member_name, BorrowRequest, LoanView};
pub use members::{MemberUpdate, NewMember};
pub use report::{InventoryTotals, ReportRow, SummaryReport};
pub use service::{LibraryService, LibraryStores, BOOKS_FILE, LOANS_FILE, MEMBERS_FILE};
