//! Library service and its store handles
//!
//! Every operation runs its own load → validate → mutate → persist cycle
//! against the stores it needs. Nothing is cached between calls, so each
//! call sees what is on disk.

use std::path::Path;

use crate::storage::{Book, Layout, Loan, Member, RecordStore};

use super::clock::{Clock, SystemClock};

/// Default file name for the book store
pub const BOOKS_FILE: &str = "books.dat";
/// Default file name for the member store
pub const MEMBERS_FILE: &str = "members.dat";
/// Default file name for the loan store
pub const LOANS_FILE: &str = "loans.dat";

/// One store per entity kind.
#[derive(Debug, Clone)]
pub struct LibraryStores {
    pub books: RecordStore<Book>,
    pub members: RecordStore<Member>,
    pub loans: RecordStore<Loan>,
}

impl LibraryStores {
    pub fn new(
        books: RecordStore<Book>,
        members: RecordStore<Member>,
        loans: RecordStore<Loan>,
    ) -> Self {
        Self {
            books,
            members,
            loans,
        }
    }

    /// Stores under `data_dir` with the default file names.
    pub fn in_dir(data_dir: &Path, layout: Layout) -> Self {
        Self::new(
            RecordStore::new(data_dir.join(BOOKS_FILE), layout),
            RecordStore::new(data_dir.join(MEMBERS_FILE), layout),
            RecordStore::new(data_dir.join(LOANS_FILE), layout),
        )
    }
}

/// Books, members and loans over three record files.
pub struct LibraryService {
    pub(super) stores: LibraryStores,
    pub(super) clock: Box<dyn Clock>,
}

impl LibraryService {
    /// Creates a service over `stores` using the system clock.
    pub fn new(stores: LibraryStores) -> Self {
        Self::with_clock(stores, Box::new(SystemClock))
    }

    /// Creates a service with an explicit clock.
    pub fn with_clock(stores: LibraryStores, clock: Box<dyn Clock>) -> Self {
        Self { stores, clock }
    }

    /// Returns the store handles.
    pub fn stores(&self) -> &LibraryStores {
        &self.stores
    }
}

impl std::fmt::Debug for LibraryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryService")
            .field("stores", &self.stores)
            .finish_non_exhaustive()
    }
}
