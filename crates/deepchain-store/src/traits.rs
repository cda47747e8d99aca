//! RecordStore trait: the abstract interface for ledger persistence.
//!
//! This trait keeps the ledger storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;

use crate::error::Result;
use crate::key::RecordKey;

/// The RecordStore trait: async interface for record persistence.
///
/// # Design Notes
///
/// - **Durable on success**: a returned `Ok` from `put` means the record
///   survives a process restart (for persistent backends).
/// - **Distinguished not-found**: `get` on a missing key returns
///   [`StoreError::NotFound`], never a generic engine error.
/// - **No caching**: every read and count re-touches the underlying
///   engine; the derived chain height is always crash-consistent.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store a record under a key, replacing any previous value.
    async fn put(&self, key: &RecordKey, value: &[u8]) -> Result<()>;

    /// Fetch the record under a key.
    ///
    /// Returns [`StoreError::NotFound`] when the key is absent.
    async fn get(&self, key: &RecordKey) -> Result<Vec<u8>>;

    /// Enumerate every stored record in insertion order.
    ///
    /// Finite, and restartable: each call starts a fresh pass over the
    /// engine.
    async fn scan(&self) -> Result<Vec<(RecordKey, Vec<u8>)>>;

    /// Number of stored records, derived by full enumeration.
    async fn count(&self) -> Result<usize> {
        Ok(self.scan().await?.len())
    }
}
