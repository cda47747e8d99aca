//! The Notary: time-windowed validation requests gating ledger writes.
//!
//! A wallet first requests validation, receives a challenge message, and
//! later submits a signature over that message. Only a confirmed request
//! entitles the wallet to append. Requests share the ledger's record store
//! under the address key space, so the two components never touch the same
//! keys.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use deepchain_core::{verify_message, ValidationRequest};
use deepchain_store::{RecordKey, RecordStore, StoreError};

use crate::error::{ChainError, Result};

/// Manages the validation-request lifecycle and signature confirmation.
pub struct Notary<S: RecordStore> {
    /// The storage backend, shared with the ledger.
    store: Arc<S>,
}

impl<S: RecordStore> Notary<S> {
    /// Create a notary over a shared store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create, refresh, or invalidate the request for an address.
    ///
    /// - No stored request (or a previously invalidated one): a fresh
    ///   request with the default window is created and stored.
    /// - A stored request still inside its window: refreshed in place -
    ///   the window restarts from the time remaining, the timestamp resets
    ///   to now, and the message is regenerated.
    /// - A stored request past its window: invalidated (address cleared)
    ///   rather than deleted, and returned so the caller sees the expiry.
    pub async fn create_or_refresh(&self, address: &str) -> Result<ValidationRequest> {
        match self.load(address).await? {
            None => {
                let request = ValidationRequest::new(address);
                self.save(address, &request).await?;
                debug!(%address, "validation request created");
                Ok(request)
            }
            Some(mut request) => {
                if request.is_valid() {
                    request.refresh();
                    self.save(address, &request).await?;
                    debug!(%address, window = request.validation_window, "validation request refreshed");
                } else {
                    request.invalidate();
                    self.save(address, &request).await?;
                    debug!(%address, "validation request expired, invalidated");
                }
                Ok(request)
            }
        }
    }

    /// Fetch the stored request for an address.
    ///
    /// Invalidated records read as absent.
    pub async fn request_for(&self, address: &str) -> Result<ValidationRequest> {
        self.load(address)
            .await?
            .ok_or_else(|| ChainError::RequestNotFound(address.to_string()))
    }

    /// Confirm a request with a wallet signature over its message.
    ///
    /// Signature-library failures (malformed signature, bad address) are
    /// folded into the mismatch outcome; nothing here crashes on bad
    /// input.
    pub async fn confirm(&self, address: &str, signature_hex: &str) -> Result<ConfirmOutcome> {
        let Some(request) = self.load(address).await? else {
            return Ok(ConfirmOutcome::NotFound);
        };

        if !request.is_valid() {
            let mut expired = request;
            expired.invalidate();
            self.save(address, &expired).await?;
            return Ok(ConfirmOutcome::Expired);
        }

        match verify_message(address, &request.message, signature_hex) {
            Ok(()) => {
                info!(%address, "validation request confirmed");
                Ok(ConfirmOutcome::Confirmed(Confirmation::from_request(request)))
            }
            Err(err) => {
                debug!(%address, %err, "signature rejected");
                Ok(ConfirmOutcome::SignatureMismatch)
            }
        }
    }

    /// Load the stored request, treating missing keys and invalidated
    /// records as absent.
    async fn load(&self, address: &str) -> Result<Option<ValidationRequest>> {
        let bytes = match self
            .store
            .get(&RecordKey::Address(address.to_string()))
            .await
        {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let request: ValidationRequest = serde_json::from_slice(&bytes)?;
        if request.is_invalidated() {
            return Ok(None);
        }
        Ok(Some(request))
    }

    async fn save(&self, address: &str, request: &ValidationRequest) -> Result<()> {
        self.store
            .put(
                &RecordKey::Address(address.to_string()),
                &serde_json::to_vec(request)?,
            )
            .await?;
        Ok(())
    }
}

/// Outcome of confirming a validation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The signature verified over the stored message.
    Confirmed(Confirmation),
    /// A valid request exists but the signature does not verify.
    SignatureMismatch,
    /// No request is stored for the address.
    NotFound,
    /// The stored request's window had already elapsed.
    Expired,
}

/// Record issued when a request is confirmed, entitling the wallet to
/// register a record on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    /// The wallet may now append.
    pub register_star: bool,
    /// Echo of the confirmed request.
    pub status: ConfirmationStatus,
}

/// The confirmed request's fields plus the signature verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationStatus {
    pub address: String,
    pub request_time_stamp: String,
    pub message: String,
    pub validation_window: i64,
    pub message_signature: String,
}

impl Confirmation {
    fn from_request(request: ValidationRequest) -> Self {
        Self {
            register_star: true,
            status: ConfirmationStatus {
                address: request.address,
                request_time_stamp: request.request_time_stamp,
                message: request.message,
                validation_window: request.validation_window,
                message_signature: "valid".to_string(),
            },
        }
    }
}
