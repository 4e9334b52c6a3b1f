//! bookvault - books, members and loans kept in fixed-size record files

pub mod cli;
pub mod crash_point;
pub mod library;
pub mod observability;
pub mod storage;
