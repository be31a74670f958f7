//! In-memory storage for accounts and books
//!
//! Stores are defined as traits so request handlers and tests can be
//! wired against isolated instances instead of process-wide state.

mod accounts;
mod books;
mod models;

pub use accounts::{AccountStore, MemoryAccountStore};
pub use books::{BookStore, MemoryBookStore};
pub use models::{Account, Book, BookFilter, NewBook, Review};
