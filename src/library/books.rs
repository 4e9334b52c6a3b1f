//! Book management
//!
//! Book ids come from the caller and are checked against every stored book,
//! active or not, since loans keep referring to deleted books by id.

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};
use crate::storage::{Book, BookStatus, RecordCodec};

use super::errors::{LibraryError, LibraryResult};
use super::service::LibraryService;

fn default_copies() -> i32 {
    1
}

/// Input for a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub book_id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default = "default_copies")]
    pub copies: i32,
}

/// Changes to a book's descriptive fields. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub book_id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub copies: Option<i32>,
}

impl LibraryService {
    /// Adds one book with `borrowed = 0` and `Active` status.
    pub fn add_book(&self, new: NewBook) -> LibraryResult<Book> {
        let books = self.stores.books.load_all()?;
        self.insert_book(&books, new)
    }

    /// Adds books in order, stopping at the first failure.
    ///
    /// Books added before a failure stay stored.
    pub fn add_books(&self, batch: Vec<NewBook>) -> LibraryResult<Vec<Book>> {
        let mut books = self.stores.books.load_all()?;
        let mut added = Vec::with_capacity(batch.len());
        for new in batch {
            let book = self.insert_book(&books, new)?;
            books.push(book.clone());
            added.push(book);
        }
        Ok(added)
    }

    fn insert_book(&self, existing: &[Book], new: NewBook) -> LibraryResult<Book> {
        if new.copies < 0 {
            return Err(LibraryError::InvalidInput(format!(
                "copies must be >= 0, got {}",
                new.copies
            )));
        }
        if existing.iter().any(|b| b.book_id == new.book_id) {
            return Err(LibraryError::DuplicateId(new.book_id));
        }

        let book = self.stores.books.stored_form(Book {
            book_id: new.book_id,
            title: new.title,
            author: new.author,
            year: new.year,
            copies: new.copies,
            borrowed: 0,
            status: BookStatus::Active,
        });
        self.stores.books.append(&book)?;

        log_event_with_fields(Event::BookAdded, &[("book_id", &book.book_id.to_string())]);
        Ok(book)
    }

    /// Every book in file order, inactive ones included.
    pub fn list_books(&self) -> LibraryResult<Vec<Book>> {
        Ok(self.stores.books.load_all()?)
    }

    /// Updates title, author, year and copies. `borrowed` and `status` are
    /// never touched here.
    pub fn update_book(&self, update: BookUpdate) -> LibraryResult<Book> {
        let mut books = self.stores.books.load_all()?;
        let book = books
            .iter_mut()
            .find(|b| b.book_id == update.book_id)
            .ok_or_else(|| LibraryError::not_found(Book::KIND, update.book_id))?;

        if let Some(copies) = update.copies {
            if copies < 0 || copies < book.borrowed {
                return Err(LibraryError::InvalidInput(format!(
                    "copies ({}) cannot be below the {} copies currently borrowed",
                    copies, book.borrowed
                )));
            }
            book.copies = copies;
        }
        if let Some(title) = update.title {
            book.title = title;
        }
        if let Some(author) = update.author {
            book.author = author;
        }
        if let Some(year) = update.year {
            book.year = year;
        }
        *book = self.stores.books.stored_form(book.clone());
        let updated = book.clone();

        self.stores.books.save_all(&books)?;

        log_event_with_fields(
            Event::BookUpdated,
            &[("book_id", &updated.book_id.to_string())],
        );
        Ok(updated)
    }

    /// Marks a book `Inactive`.
    ///
    /// Checked in order: the book exists, no open loan references it, it is
    /// not already inactive.
    pub fn delete_book(&self, book_id: i32) -> LibraryResult<Book> {
        let mut books = self.stores.books.load_all()?;
        let idx = books
            .iter()
            .position(|b| b.book_id == book_id)
            .ok_or_else(|| LibraryError::not_found(Book::KIND, book_id))?;

        let open_loans = self
            .stores
            .loans
            .load_all()?
            .iter()
            .filter(|l| l.book_id == book_id && l.is_open())
            .count();
        if open_loans > 0 {
            return Err(LibraryError::Conflict {
                book_id,
                open_loans,
            });
        }

        let book = &mut books[idx];
        if book.status == BookStatus::Inactive {
            return Err(LibraryError::AlreadyDeleted(book_id));
        }
        book.status = BookStatus::Inactive;
        let deleted = book.clone();

        self.stores.books.save_all(&books)?;

        log_event_with_fields(Event::BookDeleted, &[("book_id", &book_id.to_string())]);
        Ok(deleted)
    }
}
