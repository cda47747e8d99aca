//! # deepchain
//!
//! An append-only, hash-linked ledger of opaque records, persisted in an
//! embedded key-value store, with a time-windowed validation workflow that
//! gates writes behind a wallet signature check.
//!
//! ## Components
//!
//! - [`Ledger`] - owns append/read/height and the two-pass chain
//!   validation; serializes appends through an internal lock
//! - [`Notary`] - the validation-request lifecycle (create, refresh,
//!   invalidate) and signature confirmation
//!
//! Both share one record store under disjoint key spaces: dense integer
//! heights for blocks, address strings for requests.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use deepchain::{Ledger, Notary};
//! use deepchain::store::SqliteStore;
//! use serde_json::json;
//!
//! async fn example() {
//!     let store = Arc::new(SqliteStore::open("chaindata.db").unwrap());
//!
//!     // Opening creates the genesis block if the store is empty.
//!     let ledger = Ledger::open(store.clone()).await.unwrap();
//!     let notary = Notary::new(store);
//!
//!     let request = notary.create_or_refresh("wallet-address").await.unwrap();
//!     assert!(!request.message.is_empty());
//!
//!     let block = ledger.append(json!({"star": "data"})).await.unwrap();
//!     assert!(block.height >= 1);
//!
//!     let report = ledger.validate().await.unwrap();
//!     assert!(report.is_clean());
//! }
//! ```
//!
//! ## Design
//!
//! One ledger instance per process, reachable by all request handlers:
//! construct one store/[`Ledger`]/[`Notary`] trio at startup and hand them
//! to every consumer. There is exactly one writer; the ledger's append
//! lock makes the height-read-then-write sequence atomic against
//! concurrent handler tasks.

pub mod error;
pub mod ledger;
pub mod notary;

// Re-export component crates
pub use deepchain_core as core;
pub use deepchain_store as store;

// Re-export main types for convenience
pub use error::{ChainError, Result};
pub use ledger::{ChainReport, Ledger, GENESIS_BODY, NO_ERRORS_MARKER};
pub use notary::{ConfirmOutcome, Confirmation, ConfirmationStatus, Notary};

// Re-export commonly used core types
pub use deepchain_core::{Block, Keypair, ValidationRequest, WalletSignature};
