//! Store error definitions.

use thiserror::Error;

/// Errors that can occur during log store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite rejected a statement or the connection failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error while preparing the database location.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted row could not be mapped back into a reading.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// No reading exists with the given id.
    #[error("Reading {0} not found")]
    NotFound(i64),

    /// The store worker has shut down.
    #[error("Log store is closed")]
    Closed,
}

/// Result type for log store operations.
pub type StoreResult<T> = Result<T, StoreError>;
