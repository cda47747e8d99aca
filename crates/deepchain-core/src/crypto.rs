//! Signature verification for validation requests.
//!
//! Wraps Ed25519 so the rest of the system sees one opaque check: was this
//! signature produced over this message by the key behind this address?
//! A wallet address is the hex-encoded Ed25519 public key.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;

use crate::error::SignatureError;

/// A 64-byte Ed25519 signature submitted by a wallet.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WalletSignature(pub [u8; 64]);

impl WalletSignature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(s).map_err(|_| SignatureError::MalformedSignature)?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| SignatureError::MalformedSignature)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for WalletSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletSignature({}...)", &self.to_hex()[..16])
    }
}

/// Verify that `signature_hex` was produced over `message` by the private
/// key corresponding to `address`.
///
/// Malformed inputs yield an error rather than a panic; callers map every
/// error to a negative confirmation outcome.
pub fn verify_message(
    address: &str,
    message: &str,
    signature_hex: &str,
) -> Result<(), SignatureError> {
    let key_bytes: [u8; 32] = hex::decode(address)
        .map_err(|_| SignatureError::InvalidAddress)?
        .try_into()
        .map_err(|_| SignatureError::InvalidAddress)?;
    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|_| SignatureError::InvalidAddress)?;

    let signature = WalletSignature::from_hex(signature_hex)?;
    let sig = Signature::from_bytes(&signature.0);

    verifying_key
        .verify(message.as_bytes(), &sig)
        .map_err(|_| SignatureError::InvalidSignature)
}

/// A wallet keypair.
///
/// Production callers only ever verify; the signing half exists for tests
/// and tooling that need to play the wallet's role.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The wallet address: hex-encoded public key.
    pub fn address(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &str) -> WalletSignature {
        let sig = self.signing_key.sign(message.as_bytes());
        WalletSignature(sig.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", &self.address()[..16])
    }
}
