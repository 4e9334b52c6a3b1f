//! Record storage for bookvault
//!
//! Each entity kind lives in its own flat file of fixed-size blocks.
//!
//! # Design Principles
//!
//! - New records are appended; every change rewrites the whole file
//! - Records are never physically removed, so files only grow
//! - A truncated trailing block is an interrupted append, not corruption
//! - Any other undecodable block is surfaced as corruption

mod codec;
mod errors;
mod ids;
mod record;
mod store;

pub use codec::{BlockReader, BlockWriter, Field, Layout, RecordCodec, INT_WIDTH};
pub use errors::{StorageError, StorageErrorCode, StorageResult};
pub use ids::next_id;
pub use record::{
    Book, BookStatus, Loan, LoanStatus, Member, MemberStatus, AUTHOR_WIDTH, DATE_WIDTH,
    EMAIL_WIDTH, NAME_WIDTH, PHONE_WIDTH, TITLE_WIDTH,
};
pub use store::RecordStore;
