//! Error types for the ledger and notary.

use deepchain_core::CoreError;
use deepchain_store::StoreError;
use thiserror::Error;

/// Errors that can occur during ledger and notary operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Storage error, propagated verbatim from the record store.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Core error (canonical encoding).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A stored record failed to decode.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// No block at the given height.
    #[error("no block at height {0}")]
    BlockNotFound(u64),

    /// No validation request for the given address.
    #[error("no validation request for address {0}")]
    RequestNotFound(String),
}

impl ChainError {
    /// Whether this error signals an absent record rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BlockNotFound(_) | Self::RequestNotFound(_) | Self::Store(StoreError::NotFound(_))
        )
    }
}

/// Result type for ledger and notary operations.
pub type Result<T> = std::result::Result<T, ChainError>;
