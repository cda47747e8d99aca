//! Record keys: one physical namespace, two disjoint key spaces.
//!
//! Chain blocks live under dense non-negative integer heights, encoded as
//! canonical decimal strings. Validation requests live under the
//! requester's address, stored behind an `addr:` prefix. Addresses are
//! caller-chosen strings, so without the prefix a pure-decimal address
//! would collide with a height key and distort the derived chain height.

use std::fmt;

const ADDRESS_PREFIX: &str = "addr:";

/// A key in the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// A chain position. Dense: every height in `0..=tip` is present.
    Height(u64),
    /// A validation-request address.
    Address(String),
}

impl RecordKey {
    /// Encode to the stored string form.
    pub fn encode(&self) -> String {
        match self {
            Self::Height(h) => h.to_string(),
            Self::Address(a) => format!("{ADDRESS_PREFIX}{a}"),
        }
    }

    /// Decode from the stored string form.
    pub fn decode(s: &str) -> Self {
        if let Some(address) = s.strip_prefix(ADDRESS_PREFIX) {
            return Self::Address(address.to_string());
        }
        match s.parse::<u64>() {
            Ok(h) => Self::Height(h),
            Err(_) => Self::Address(s.to_string()),
        }
    }

    /// The height, if this key is in the chain key space.
    pub fn as_height(&self) -> Option<u64> {
        match self {
            Self::Height(h) => Some(*h),
            Self::Address(_) => None,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
