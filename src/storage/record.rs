//! Entity records and their block layouts
//!
//! ```text
//! Book   | book_id i32 | title 50s | author 30s | year i32 | copies i32 | borrowed i32 | status i32 |
//! Member | member_id i32 | name 40s | email 40s | phone 15s | status i32 | total_borrows i32 |
//! Loan   | borrow_id i32 | book_id i32 | member_id i32 | loan_date 10s | due_date 10s | return_date 10s | status i32 |
//! ```
//!
//! Status tags share the integer values 0 and 1 across entities, but each
//! entity decodes them into its own enum.

use std::io;

use serde::{Deserialize, Serialize};

use super::codec::{BlockReader, BlockWriter, Field, RecordCodec};

pub const TITLE_WIDTH: usize = 50;
pub const AUTHOR_WIDTH: usize = 30;
pub const NAME_WIDTH: usize = 40;
pub const EMAIL_WIDTH: usize = 40;
pub const PHONE_WIDTH: usize = 15;
pub const DATE_WIDTH: usize = 10;

fn unknown_status(kind: &str, tag: i32) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Unknown {} status tag: {}", kind, tag),
    )
}

/// Book availability for new loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    Inactive = 0,
    Active = 1,
}

impl BookStatus {
    fn from_tag(tag: i32) -> io::Result<Self> {
        match tag {
            0 => Ok(BookStatus::Inactive),
            1 => Ok(BookStatus::Active),
            other => Err(unknown_status(Book::KIND, other)),
        }
    }
}

/// Member standing; `Blocked` is the soft-deleted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Blocked = 0,
    Active = 1,
}

impl MemberStatus {
    fn from_tag(tag: i32) -> io::Result<Self> {
        match tag {
            0 => Ok(MemberStatus::Blocked),
            1 => Ok(MemberStatus::Active),
            other => Err(unknown_status(Member::KIND, other)),
        }
    }
}

/// Loan state. `Borrowed` is initial, `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Borrowed = 0,
    Returned = 1,
}

impl LoanStatus {
    fn from_tag(tag: i32) -> io::Result<Self> {
        match tag {
            0 => Ok(LoanStatus::Borrowed),
            1 => Ok(LoanStatus::Returned),
            other => Err(unknown_status(Loan::KIND, other)),
        }
    }

    /// Whether a loan in this state may move to `next`.
    pub fn can_transition_to(self, next: LoanStatus) -> bool {
        matches!((self, next), (LoanStatus::Borrowed, LoanStatus::Returned))
    }
}

/// A catalogued title and its copy counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub copies: i32,
    /// Copies currently out on loan, `0..=copies`
    pub borrowed: i32,
    pub status: BookStatus,
}

impl Book {
    /// Copies on the shelf right now.
    pub fn available(&self) -> i32 {
        self.copies.saturating_sub(self.borrowed)
    }

    pub fn is_active(&self) -> bool {
        self.status == BookStatus::Active
    }
}

impl RecordCodec for Book {
    const KIND: &'static str = "book";
    const FIELDS: &'static [Field] = &[
        Field::Int,
        Field::Str(TITLE_WIDTH),
        Field::Str(AUTHOR_WIDTH),
        Field::Int,
        Field::Int,
        Field::Int,
        Field::Int,
    ];

    fn encode_fields(&self, w: &mut BlockWriter) {
        w.put_i32(self.book_id);
        w.put_str(&self.title, TITLE_WIDTH);
        w.put_str(&self.author, AUTHOR_WIDTH);
        w.put_i32(self.year);
        w.put_i32(self.copies);
        w.put_i32(self.borrowed);
        w.put_i32(self.status as i32);
    }

    fn decode_fields(r: &mut BlockReader<'_>) -> io::Result<Self> {
        Ok(Self {
            book_id: r.get_i32()?,
            title: r.get_str(TITLE_WIDTH)?,
            author: r.get_str(AUTHOR_WIDTH)?,
            year: r.get_i32()?,
            copies: r.get_i32()?,
            borrowed: r.get_i32()?,
            status: BookStatus::from_tag(r.get_i32()?)?,
        })
    }
}

/// A library patron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: MemberStatus,
    /// Lifetime borrow count; never decremented
    pub total_borrows: i32,
}

impl Member {
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

impl RecordCodec for Member {
    const KIND: &'static str = "member";
    const FIELDS: &'static [Field] = &[
        Field::Int,
        Field::Str(NAME_WIDTH),
        Field::Str(EMAIL_WIDTH),
        Field::Str(PHONE_WIDTH),
        Field::Int,
        Field::Int,
    ];

    fn encode_fields(&self, w: &mut BlockWriter) {
        w.put_i32(self.member_id);
        w.put_str(&self.name, NAME_WIDTH);
        w.put_str(&self.email, EMAIL_WIDTH);
        w.put_str(&self.phone, PHONE_WIDTH);
        w.put_i32(self.status as i32);
        w.put_i32(self.total_borrows);
    }

    fn decode_fields(r: &mut BlockReader<'_>) -> io::Result<Self> {
        Ok(Self {
            member_id: r.get_i32()?,
            name: r.get_str(NAME_WIDTH)?,
            email: r.get_str(EMAIL_WIDTH)?,
            phone: r.get_str(PHONE_WIDTH)?,
            status: MemberStatus::from_tag(r.get_i32()?)?,
            total_borrows: r.get_i32()?,
        })
    }
}

/// One borrowing of one book by one member.
///
/// `book_id` and `member_id` are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub borrow_id: i32,
    pub book_id: i32,
    pub member_id: i32,
    pub loan_date: String,
    /// Caller-supplied, not validated as a date
    pub due_date: String,
    /// Empty until returned
    pub return_date: String,
    pub status: LoanStatus,
}

impl Loan {
    pub fn is_open(&self) -> bool {
        self.status == LoanStatus::Borrowed
    }
}

impl RecordCodec for Loan {
    const KIND: &'static str = "loan";
    const FIELDS: &'static [Field] = &[
        Field::Int,
        Field::Int,
        Field::Int,
        Field::Str(DATE_WIDTH),
        Field::Str(DATE_WIDTH),
        Field::Str(DATE_WIDTH),
        Field::Int,
    ];

    fn encode_fields(&self, w: &mut BlockWriter) {
        w.put_i32(self.borrow_id);
        w.put_i32(self.book_id);
        w.put_i32(self.member_id);
        w.put_str(&self.loan_date, DATE_WIDTH);
        w.put_str(&self.due_date, DATE_WIDTH);
        w.put_str(&self.return_date, DATE_WIDTH);
        w.put_i32(self.status as i32);
    }

    fn decode_fields(r: &mut BlockReader<'_>) -> io::Result<Self> {
        Ok(Self {
            borrow_id: r.get_i32()?,
            book_id: r.get_i32()?,
            member_id: r.get_i32()?,
            loan_date: r.get_str(DATE_WIDTH)?,
            due_date: r.get_str(DATE_WIDTH)?,
            return_date: r.get_str(DATE_WIDTH)?,
            status: LoanStatus::from_tag(r.get_i32()?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::codec::Layout;

    fn sample_book() -> Book {
        Book {
            book_id: 7,
            title: "The Left Hand of Darkness".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            year: 1969,
            copies: 3,
            borrowed: 1,
            status: BookStatus::Active,
        }
    }

    fn sample_member() -> Member {
        Member {
            member_id: 2,
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            phone: "555-0101".to_string(),
            status: MemberStatus::Blocked,
            total_borrows: 4,
        }
    }

    fn sample_loan() -> Loan {
        Loan {
            borrow_id: 11,
            book_id: 7,
            member_id: 2,
            loan_date: "2025-01-01".to_string(),
            due_date: "2025-01-15".to_string(),
            return_date: String::new(),
            status: LoanStatus::Borrowed,
        }
    }

    #[test]
    fn test_available_saturates_on_corrupt_counters() {
        let mut book = sample_book();
        book.copies = 5;
        book.borrowed = i32::MIN;
        assert_eq!(book.available(), i32::MAX);

        book.copies = i32::MIN;
        book.borrowed = 1;
        assert_eq!(book.available(), i32::MIN);
    }

    #[test]
    fn test_stored_form_truncates_strings() {
        let mut loan = sample_loan();
        loan.due_date = "2025-01-15T12:00".to_string();
        let stored = loan.stored(Layout::Packed);
        assert_eq!(stored.due_date, "2025-01-15");
        assert_eq!(stored.loan_date, "2025-01-01");

        let book = sample_book();
        assert_eq!(book.clone().stored(Layout::Aligned), book);
    }

    #[test]
    fn test_block_sizes() {
        assert_eq!(Book::block_size(Layout::Packed), 100);
        assert_eq!(Member::block_size(Layout::Packed), 107);
        assert_eq!(Loan::block_size(Layout::Packed), 46);

        assert_eq!(Book::block_size(Layout::Aligned), 100);
        assert_eq!(Member::block_size(Layout::Aligned), 108);
        assert_eq!(Loan::block_size(Layout::Aligned), 48);
    }

    #[test]
    fn test_book_record_roundtrip() {
        let book = sample_book();
        let block = book.encode(Layout::Packed);
        assert_eq!(block.len(), 100);
        assert_eq!(Book::decode(&block, Layout::Packed).unwrap(), Some(book));
    }

    #[test]
    fn test_member_aligned_roundtrip() {
        let member = sample_member();
        let block = member.encode(Layout::Aligned);
        assert_eq!(block.len(), 108);
        // one padding byte after the 15-byte phone
        assert_eq!(block[99], 0);
        assert_eq!(Member::decode(&block, Layout::Aligned).unwrap(), Some(member));
    }

    #[test]
    fn test_loan_field_offsets() {
        let block = sample_loan().encode(Layout::Packed);
        assert_eq!(&block[0..4], &11i32.to_le_bytes());
        assert_eq!(&block[4..8], &7i32.to_le_bytes());
        assert_eq!(&block[12..22], b"2025-01-01");
        assert_eq!(&block[32..42], &[0u8; 10]);
        assert_eq!(&block[42..46], &0i32.to_le_bytes());
    }

    #[test]
    fn test_long_title_truncated_on_encode() {
        let mut book = sample_book();
        book.title = "x".repeat(80);
        let block = book.encode(Layout::Packed);
        let decoded = Book::decode(&block, Layout::Packed).unwrap().unwrap();
        assert_eq!(decoded.title.len(), TITLE_WIDTH);
    }

    #[test]
    fn test_short_block_is_no_record() {
        let block = sample_book().encode(Layout::Packed);
        assert_eq!(Book::decode(&block[..99], Layout::Packed).unwrap(), None);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut block = sample_loan().encode(Layout::Packed);
        block[42..46].copy_from_slice(&7i32.to_le_bytes());
        let err = Loan::decode(&block, Layout::Packed).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("Unknown loan status tag: 7"));
    }

    #[test]
    fn test_loan_transitions() {
        assert!(LoanStatus::Borrowed.can_transition_to(LoanStatus::Returned));
        assert!(!LoanStatus::Returned.can_transition_to(LoanStatus::Borrowed));
        assert!(!LoanStatus::Returned.can_transition_to(LoanStatus::Returned));
        assert!(!LoanStatus::Borrowed.can_transition_to(LoanStatus::Borrowed));
    }

    #[test]
    fn test_status_tags_are_shared_integers() {
        assert_eq!(BookStatus::Inactive as i32, MemberStatus::Blocked as i32);
        assert_eq!(LoanStatus::Returned as i32, BookStatus::Active as i32);
    }
}
