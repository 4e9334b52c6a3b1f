//! Loan lifecycle
//!
//! ```text
//! borrow ──> Borrowed ──return──> Returned (terminal)
//! ```
//!
//! Borrow writes three files (loan append, book rewrite, member rewrite) and
//! return writes two (loan rewrite, book rewrite). The writes are
//! independent: a crash between them leaves the files disagreeing, and
//! nothing repairs that automatically.

use serde::{Deserialize, Serialize};

use crate::crash_point::{maybe_crash, points};
use crate::observability::{log_event_with_fields, Event};
use crate::storage::{next_id, Loan, LoanStatus, RecordCodec};

use super::errors::{LibraryError, LibraryResult};
use super::service::LibraryService;

/// Input for a new loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRequest {
    pub book_id: i32,
    pub member_id: i32,
    /// Free text, stored as given (truncated to the field width)
    #[serde(default)]
    pub due_date: String,
}

/// A loan joined with the book title and member name it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanView {
    #[serde(flatten)]
    pub loan: Loan,
    pub book_title: String,
    pub member_name: String,
}

/// Display name for a book id with no stored record.
pub fn placeholder_book_title(book_id: i32) -> String {
    format!("Book{}", book_id)
}

/// Display name for a member id with no stored record.
pub fn placeholder_member_name(member_id: i32) -> String {
    format!("Member{}", member_id)
}

impl LibraryService {
    /// Lends one copy of a book to a member.
    ///
    /// Preconditions, first failure wins: the book exists and is active, the
    /// member exists and is active, a copy is available.
    pub fn borrow_book(&self, request: BorrowRequest) -> LibraryResult<Loan> {
        let mut books = self.stores.books.load_all()?;
        let mut members = self.stores.members.load_all()?;
        let loans = self.stores.loans.load_all()?;

        let book_idx = books
            .iter()
            .position(|b| b.book_id == request.book_id && b.is_active())
            .ok_or(LibraryError::BookUnavailable(request.book_id))?;
        let member_idx = members
            .iter()
            .position(|m| m.member_id == request.member_id && m.is_active())
            .ok_or(LibraryError::MemberInvalid(request.member_id))?;
        if books[book_idx].borrowed >= books[book_idx].copies {
            return Err(LibraryError::NoCopiesAvailable(request.book_id));
        }

        let borrow_id = next_id(&loans, |l| l.borrow_id).ok_or_else(|| {
            LibraryError::InvalidInput(format!("{} ids are exhausted", Loan::KIND))
        })?;
        let loan = self.stores.loans.stored_form(Loan {
            borrow_id,
            book_id: request.book_id,
            member_id: request.member_id,
            loan_date: self.clock.today(),
            due_date: request.due_date,
            return_date: String::new(),
            status: LoanStatus::Borrowed,
        });
        self.stores.loans.append(&loan)?;
        maybe_crash(points::BORROW_AFTER_LOAN_APPEND);

        books[book_idx].borrowed += 1;
        self.stores.books.save_all(&books)?;
        maybe_crash(points::BORROW_AFTER_BOOK_REWRITE);

        members[member_idx].total_borrows += 1;
        self.stores.members.save_all(&members)?;

        log_event_with_fields(
            Event::LoanOpened,
            &[
                ("book_id", &loan.book_id.to_string()),
                ("borrow_id", &loan.borrow_id.to_string()),
                ("member_id", &loan.member_id.to_string()),
            ],
        );
        Ok(loan)
    }

    /// Closes an open loan and puts the copy back on the shelf.
    pub fn return_book(&self, borrow_id: i32) -> LibraryResult<Loan> {
        let mut loans = self.stores.loans.load_all()?;
        let loan = loans
            .iter_mut()
            .find(|l| l.borrow_id == borrow_id && l.status.can_transition_to(LoanStatus::Returned))
            .ok_or(LibraryError::ActiveLoanNotFound(borrow_id))?;

        loan.status = LoanStatus::Returned;
        loan.return_date = self.clock.today();
        let returned = loan.clone();

        self.stores.loans.save_all(&loans)?;
        maybe_crash(points::RETURN_AFTER_LOAN_REWRITE);

        // A loan whose book record is missing still closes.
        let mut books = self.stores.books.load_all()?;
        if let Some(book) = books.iter_mut().find(|b| b.book_id == returned.book_id) {
            book.borrowed = (book.borrowed - 1).max(0);
            self.stores.books.save_all(&books)?;
        }

        log_event_with_fields(
            Event::LoanReturned,
            &[
                ("book_id", &returned.book_id.to_string()),
                ("borrow_id", &borrow_id.to_string()),
            ],
        );
        Ok(returned)
    }

    /// Every loan in file order with book title and member name resolved.
    ///
    /// Ids with no stored record resolve to `Book{id}` / `Member{id}`.
    pub fn list_loans(&self) -> LibraryResult<Vec<LoanView>> {
        let books = self.stores.books.load_all()?;
        let members = self.stores.members.load_all()?;
        let loans = self.stores.loans.load_all()?;

        Ok(loans
            .into_iter()
            .map(|loan| {
                let book_title = books
                    .iter()
                    .find(|b| b.book_id == loan.book_id)
                    .map(|b| b.title.clone())
                    .unwrap_or_else(|| placeholder_book_title(loan.book_id));
                let member_name = members
                    .iter()
                    .find(|m| m.member_id == loan.member_id)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| placeholder_member_name(loan.member_id));
                LoanView {
                    loan,
                    book_title,
                    member_name,
                }
            })
            .collect())
    }
}
