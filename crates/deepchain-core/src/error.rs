//! Error types for deepchain core.

use thiserror::Error;

/// Errors from pure block operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Canonical JSON encoding failed.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Errors from signature verification.
///
/// All of these are recoverable: callers turn them into a negative
/// confirmation outcome rather than propagating them as failures.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The address is not a valid hex-encoded Ed25519 public key.
    #[error("invalid wallet address")]
    InvalidAddress,

    /// The signature is not 64 hex-decodable bytes.
    #[error("malformed signature")]
    MalformedSignature,

    /// The signature does not verify over the message.
    #[error("signature verification failed")]
    InvalidSignature,
}
