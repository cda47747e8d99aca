//! # Deepchain Core
//!
//! Pure primitives for the deepchain ledger: blocks, validation requests,
//! canonical hashing, and signature verification.
//!
//! This crate contains no I/O and no storage. It is pure computation over
//! the ledger's data structures.
//!
//! ## Key Types
//!
//! - [`Block`] - One immutable, hash-linked ledger entry
//! - [`ValidationRequest`] - A time-boxed challenge binding an address to a message
//! - [`Keypair`] - Ed25519 identity whose hex public key is the wallet address
//!
//! ## Canonical Hashing
//!
//! A block's hash is SHA-256 over its canonical JSON encoding with the
//! `hash` field cleared. See [`Block::compute_hash`].

pub mod block;
pub mod crypto;
pub mod error;
pub mod request;

pub use block::Block;
pub use crypto::{verify_message, Keypair, WalletSignature};
pub use error::{CoreError, SignatureError};
pub use request::{ValidationRequest, DEFAULT_VALIDATION_WINDOW};
