//! In-memory implementation of the RecordStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::key::RecordKey;
use crate::traits::RecordStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
/// Insertion order is tracked so `scan` matches the SQLite backend.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Values indexed by encoded key.
    entries: HashMap<String, Vec<u8>>,

    /// Encoded keys in first-insertion order.
    order: Vec<String>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                entries: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, key: &RecordKey, value: &[u8]) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let encoded = key.encode();
        if !inner.entries.contains_key(&encoded) {
            inner.order.push(encoded.clone());
        }
        inner.entries.insert(encoded, value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &RecordKey) -> Result<Vec<u8>> {
        let inner = self.inner.read().unwrap();
        inner
            .entries
            .get(&key.encode())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.encode()))
    }

    async fn scan(&self) -> Result<Vec<(RecordKey, Vec<u8>)>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .order
            .iter()
            .filter_map(|encoded| {
                inner
                    .entries
                    .get(encoded)
                    .map(|value| (RecordKey::decode(encoded), value.clone()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        store.put(&RecordKey::Height(0), b"genesis").await.unwrap();

        let value = store.get(&RecordKey::Height(0)).await.unwrap();
        assert_eq!(value, b"genesis");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get(&RecordKey::Height(7)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_overwrite_does_not_grow_count() {
        let store = MemoryStore::new();
        let key = RecordKey::Address("addr1".to_string());

        store.put(&key, b"first").await.unwrap();
        store.put(&key, b"second").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.get(&key).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_scan_insertion_order() {
        let store = MemoryStore::new();
        store.put(&RecordKey::Height(0), b"a").await.unwrap();
        store
            .put(&RecordKey::Address("addr1".to_string()), b"r")
            .await
            .unwrap();
        store.put(&RecordKey::Height(1), b"b").await.unwrap();

        let keys: Vec<RecordKey> = store
            .scan()
            .await
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec![
                RecordKey::Height(0),
                RecordKey::Address("addr1".to_string()),
                RecordKey::Height(1),
            ]
        );
    }
}
