//! Presence state access for iqnotify
//!
//! Provides:
//! - The read-only `PresenceStore` interface
//! - An in-memory store (tests, embedding hosts)
//! - A SQLite store reading a recorder's presence table
//! - The snapshot reader turning configured pairs into presence facts

mod memory;
mod snapshot;
mod sqlite;
mod traits;

pub use memory::*;
pub use snapshot::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt record for {entity}: {message}")]
    Corrupt { entity: String, message: String },

    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
