//! # Deepchain Store
//!
//! Persistence for the deepchain ledger. One physical key-value namespace
//! behind the [`RecordStore`] trait, holding two disjoint key spaces:
//! dense integer heights for chain blocks and address strings for
//! validation requests (see [`RecordKey`]).
//!
//! The primary implementation is [`SqliteStore`]; [`MemoryStore`] exists
//! for tests. The store knows nothing about block semantics — it is a
//! durable `put`/`get`/`scan` surface and nothing more.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use deepchain_store::{RecordKey, RecordStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("chaindata.db").unwrap();
//!     store.put(&RecordKey::Height(0), b"{...}").await.unwrap();
//!     let value = store.get(&RecordKey::Height(0)).await.unwrap();
//!     assert!(!value.is_empty());
//! }
//! ```

pub mod error;
pub mod key;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use key::RecordKey;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::RecordStore;
