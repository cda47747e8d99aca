//! SQLite implementation of the RecordStore trait.
//!
//! This is the primary storage backend for deepchain. It uses rusqlite
//! with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::key::RecordKey;
use crate::migration;
use crate::traits::RecordStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        debug!("record store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

/// Map a poisoned connection mutex to a store error.
fn poisoned(detail: impl std::fmt::Display) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
        Some(format!("mutex poisoned: {}", detail)),
    ))
}

/// Map a failed spawn_blocking join to a store error.
fn join_failed(detail: impl std::fmt::Display) -> StoreError {
    StoreError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
        Some(format!("spawn_blocking failed: {}", detail)),
    ))
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn put(&self, key: &RecordKey, value: &[u8]) -> Result<()> {
        let encoded = key.encode();
        let value = value.to_vec();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            conn.execute(
                "INSERT INTO records (key, value, stored_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![encoded, value, now_secs()],
            )?;

            Ok(())
        })
        .await
        .map_err(join_failed)?
    }

    async fn get(&self, key: &RecordKey) -> Result<Vec<u8>> {
        let encoded = key.encode();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            let value: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT value FROM records WHERE key = ?1",
                    params![encoded],
                    |row| row.get(0),
                )
                .optional()?;

            value.ok_or(StoreError::NotFound(encoded))
        })
        .await
        .map_err(join_failed)?
    }

    async fn scan(&self) -> Result<Vec<(RecordKey, Vec<u8>)>> {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(poisoned)?;

            let mut stmt = conn.prepare("SELECT key, value FROM records ORDER BY rowid")?;
            let rows = stmt.query_map([], |row| {
                let key: String = row.get(0)?;
                let value: Vec<u8> = row.get(1)?;
                Ok((RecordKey::decode(&key), value))
            })?;

            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(join_failed)?
    }
}

/// Get current time in seconds.
fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}
