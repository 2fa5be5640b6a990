//! SQLite persistence adapters.
//!
//! Provides SQLite-backed implementations of the record store and the
//! user directory using Diesel ORM.

pub mod database;
pub mod directory;
pub mod store;

pub use directory::SqliteUserDirectory;
pub use store::SqliteRecordStore;
