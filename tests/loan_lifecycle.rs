//! Loan Lifecycle Tests
//!
//! End-to-end runs of borrow, return and delete against real files:
//! - `0 <= borrowed <= copies` after every operation
//! - A loan moves `Borrowed -> Returned` exactly once
//! - A book with open loans cannot be deleted
//! - State survives reopening the stores

use bookvault::library::{
    BorrowRequest, FixedClock, LibraryError, LibraryService, LibraryStores, NewBook, NewMember,
};
use bookvault::storage::{BookStatus, Layout, LoanStatus};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn open_service(temp_dir: &TempDir) -> LibraryService {
    let clock = FixedClock::on(2025, 1, 2).expect("valid date");
    LibraryService::with_clock(
        LibraryStores::in_dir(temp_dir.path(), Layout::Packed),
        Box::new(clock),
    )
}

fn borrow(book_id: i32, member_id: i32) -> BorrowRequest {
    BorrowRequest {
        book_id,
        member_id,
        due_date: "2025-01-01".to_string(),
    }
}

/// One book with two copies and one active member.
fn seeded(temp_dir: &TempDir) -> LibraryService {
    let svc = open_service(temp_dir);
    svc.add_book(NewBook {
        book_id: 1,
        title: "The Left Hand of Darkness".to_string(),
        author: "Le Guin".to_string(),
        year: 1969,
        copies: 2,
    })
    .unwrap();
    svc.add_member(NewMember {
        name: "Ann".to_string(),
        email: "ann@example.org".to_string(),
        phone: "555-0100".to_string(),
    })
    .unwrap();
    svc
}

fn assert_counters_in_range(svc: &LibraryService) {
    for book in svc.list_books().unwrap() {
        assert!(
            0 <= book.borrowed && book.borrowed <= book.copies,
            "book {} has borrowed={} copies={}",
            book.book_id,
            book.borrowed,
            book.copies
        );
    }
}

// =============================================================================
// Borrow
// =============================================================================

#[test]
fn test_borrow_until_no_copies_left() {
    let temp_dir = TempDir::new().unwrap();
    let svc = seeded(&temp_dir);

    let first = svc.borrow_book(borrow(1, 1)).unwrap();
    assert_eq!(first.borrow_id, 1);
    assert_eq!(first.status, LoanStatus::Borrowed);
    assert_eq!(svc.list_books().unwrap()[0].borrowed, 1);

    svc.borrow_book(borrow(1, 1)).unwrap();
    assert_eq!(svc.list_books().unwrap()[0].borrowed, 2);

    let err = svc.borrow_book(borrow(1, 1)).unwrap_err();
    assert!(matches!(err, LibraryError::NoCopiesAvailable(1)));
    assert_eq!(err.code(), "BOOKVAULT_NO_COPIES_AVAILABLE");

    assert_eq!(svc.list_loans().unwrap().len(), 2);
    assert_eq!(svc.list_members().unwrap()[0].total_borrows, 2);
    assert_counters_in_range(&svc);
}

// =============================================================================
// Return
// =============================================================================

#[test]
fn test_return_is_one_way() {
    let temp_dir = TempDir::new().unwrap();
    let svc = seeded(&temp_dir);
    svc.borrow_book(borrow(1, 1)).unwrap();
    svc.borrow_book(borrow(1, 1)).unwrap();

    let returned = svc.return_book(1).unwrap();
    assert_eq!(returned.status, LoanStatus::Returned);
    assert!(!returned.return_date.is_empty());
    assert_eq!(svc.list_books().unwrap()[0].borrowed, 1);

    let err = svc.return_book(1).unwrap_err();
    assert!(matches!(err, LibraryError::ActiveLoanNotFound(1)));
    assert_eq!(svc.list_books().unwrap()[0].borrowed, 1);

    // a returned loan keeps its id; new loans get a fresh one
    let next = svc.borrow_book(borrow(1, 1)).unwrap();
    assert_eq!(next.borrow_id, 3);
    assert_counters_in_range(&svc);
}

#[test]
fn test_return_unknown_loan() {
    let temp_dir = TempDir::new().unwrap();
    let svc = seeded(&temp_dir);

    assert!(matches!(
        svc.return_book(42).unwrap_err(),
        LibraryError::ActiveLoanNotFound(42)
    ));
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_delete_blocked_by_open_loan() {
    let temp_dir = TempDir::new().unwrap();
    let svc = seeded(&temp_dir);
    svc.borrow_book(borrow(1, 1)).unwrap();
    svc.borrow_book(borrow(1, 1)).unwrap();
    svc.return_book(1).unwrap();

    let err = svc.delete_book(1).unwrap_err();
    assert!(matches!(
        err,
        LibraryError::Conflict {
            book_id: 1,
            open_loans: 1
        }
    ));
    assert_eq!(svc.list_books().unwrap()[0].status, BookStatus::Active);

    svc.return_book(2).unwrap();
    let deleted = svc.delete_book(1).unwrap();
    assert_eq!(deleted.status, BookStatus::Inactive);

    assert!(matches!(
        svc.delete_book(1).unwrap_err(),
        LibraryError::AlreadyDeleted(1)
    ));

    // the record and its history remain
    assert_eq!(svc.list_books().unwrap().len(), 1);
    assert_eq!(svc.list_loans().unwrap().len(), 2);
}

#[test]
fn test_deleted_book_id_cannot_be_reused() {
    let temp_dir = TempDir::new().unwrap();
    let svc = seeded(&temp_dir);
    svc.delete_book(1).unwrap();

    let err = svc
        .add_book(NewBook {
            book_id: 1,
            title: "Another".to_string(),
            author: String::new(),
            year: 0,
            copies: 1,
        })
        .unwrap_err();
    assert!(matches!(err, LibraryError::DuplicateId(1)));
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let svc = seeded(&temp_dir);
        svc.borrow_book(borrow(1, 1)).unwrap();
    }

    let svc = open_service(&temp_dir);
    let loans = svc.list_loans().unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].book_title, "The Left Hand of Darkness");
    assert_eq!(loans[0].member_name, "Ann");
    assert_eq!(loans[0].loan.loan_date, "2025-01-02");

    let report = svc.generate_summary_report().unwrap();
    assert_eq!(report.totals.borrowed, 1);
    assert_eq!(report.totals.available, 1);
    assert!(report.rows.iter().all(|r| r.is_consistent()));
}

#[test]
fn test_mixed_sequence_keeps_counters_in_range() {
    let temp_dir = TempDir::new().unwrap();
    let svc = seeded(&temp_dir);
    svc.add_member(NewMember {
        name: "Bo".to_string(),
        ..Default::default()
    })
    .unwrap();

    let mut open = Vec::new();
    for step in 0..12 {
        let member_id = 1 + step % 2;
        match svc.borrow_book(borrow(1, member_id)) {
            Ok(loan) => open.push(loan.borrow_id),
            Err(LibraryError::NoCopiesAvailable(_)) => {
                let borrow_id = open.remove(0);
                svc.return_book(borrow_id).unwrap();
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
        assert_counters_in_range(&svc);
    }

    let book = &svc.list_books().unwrap()[0];
    assert_eq!(book.borrowed as usize, open.len());
}
