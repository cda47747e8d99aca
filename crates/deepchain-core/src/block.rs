//! Block: one immutable entry of the hash-linked ledger.
//!
//! A block is constructed with only its body; the ledger fills in height,
//! timestamp, previous hash, and finally the block's own hash at append
//! time. Once stored, a block is never mutated.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// One ledger entry.
///
/// Serialized field names follow the wire shape:
/// `height`, `timestamp`, `body`, `previousHash`, `hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Zero-based position in the ledger. Height 0 is the genesis block.
    pub height: u64,

    /// Seconds-resolution wall-clock time at creation, stored as a string.
    pub timestamp: String,

    /// Opaque payload chosen by the caller.
    pub body: serde_json::Value,

    /// Hash of the block at `height - 1`. Empty string only for genesis.
    pub previous_hash: String,

    /// SHA-256 over the canonical encoding with this field cleared.
    pub hash: String,
}

impl Block {
    /// Create a candidate block holding only the caller's body.
    ///
    /// Height, timestamp, previous hash, and hash are filled in by the
    /// ledger at append time, in that order.
    pub fn new(body: serde_json::Value) -> Self {
        Self {
            height: 0,
            timestamp: String::new(),
            body,
            previous_hash: String::new(),
            hash: String::new(),
        }
    }

    /// Compute this block's content hash.
    ///
    /// The `hash` field itself is treated as empty during computation, so
    /// the result is stable whether or not the field is already set.
    pub fn compute_hash(&self) -> Result<String, CoreError> {
        let mut unhashed = self.clone();
        unhashed.hash = String::new();
        let canonical = serde_json::to_string(&unhashed)?;
        let digest = Sha256::digest(canonical.as_bytes());
        Ok(hex::encode(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_block() -> Block {
        let mut block = Block::new(json!("test payload"));
        block.height = 3;
        block.timestamp = "1532296090".to_string();
        block.previous_hash = "ab".repeat(32);
        block
    }

    #[test]
    fn test_hash_deterministic() {
        let block = sample_block();
        let h1 = block.compute_hash().unwrap();
        let h2 = block.compute_hash().unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_hash_ignores_own_hash_field() {
        let mut block = sample_block();
        let before = block.compute_hash().unwrap();
        block.hash = before.clone();
        let after = block.compute_hash().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_hash_covers_body() {
        let mut block = sample_block();
        let original = block.compute_hash().unwrap();
        block.body = json!("tampered payload");
        assert_ne!(original, block.compute_hash().unwrap());
    }

    #[test]
    fn test_hash_covers_link() {
        let mut block = sample_block();
        let original = block.compute_hash().unwrap();
        block.previous_hash = "cd".repeat(32);
        assert_ne!(original, block.compute_hash().unwrap());
    }

    #[test]
    fn test_wire_field_names() {
        let mut block = sample_block();
        block.hash = block.compute_hash().unwrap();
        let value = serde_json::to_value(&block).unwrap();
        assert!(value.get("previousHash").is_some());
        assert!(value.get("timestamp").is_some());
        assert!(value.get("previous_hash").is_none());
    }
}
