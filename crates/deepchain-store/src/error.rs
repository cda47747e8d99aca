//! Error types for the store.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// A missing key is a distinguished condition, not an engine failure:
/// callers routinely probe for absent heights and addresses.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record under the given key.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Database error from SQLite, propagated verbatim.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
