//! Validation request: a time-boxed challenge binding an address to a message.
//!
//! The message is always recomputable from the address and timestamp as
//! `"{address}:{timestamp}:starRegistry"`. A request is valid while
//! `requestTimeStamp + validationWindow >= now`. On refresh the window is
//! set to the time *remaining* at the call, not back to the default, so a
//! request's window only ever shrinks across resubmissions.

use serde::{Deserialize, Serialize};

/// Default time-to-live of a fresh request, in seconds.
pub const DEFAULT_VALIDATION_WINDOW: i64 = 300;

const MESSAGE_SUFFIX: &str = "starRegistry";

/// A stored validation request, keyed by the requester's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    /// Requester wallet address. Cleared to the empty string when the
    /// request is invalidated; readers treat that as absent.
    pub address: String,

    /// Creation (or last refresh) time, unix seconds as a string.
    pub request_time_stamp: String,

    /// The challenge the wallet must sign.
    pub message: String,

    /// Seconds of validity remaining from `request_time_stamp`.
    pub validation_window: i64,
}

impl ValidationRequest {
    /// Create a fresh request for an address with the default window.
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        let request_time_stamp = now_secs().to_string();
        let message = generate_message(&address, &request_time_stamp);
        Self {
            address,
            request_time_stamp,
            message,
            validation_window: DEFAULT_VALIDATION_WINDOW,
        }
    }

    /// Seconds of validity left; negative once expired.
    pub fn remaining_window(&self) -> i64 {
        let stamp: i64 = self.request_time_stamp.parse().unwrap_or(0);
        stamp + self.validation_window - now_secs()
    }

    /// Whether the request is still inside its validation window.
    pub fn is_valid(&self) -> bool {
        self.remaining_window() >= 0
    }

    /// Restart the request from now with the window it had left.
    ///
    /// Only meaningful while the request is valid; callers must check
    /// [`is_valid`](Self::is_valid) first and invalidate otherwise.
    pub fn refresh(&mut self) {
        self.validation_window = self.remaining_window();
        self.request_time_stamp = now_secs().to_string();
        self.message = generate_message(&self.address, &self.request_time_stamp);
    }

    /// Invalidate the request by clearing its address.
    ///
    /// The record stays in the store; every reader treats an empty address
    /// as "no request".
    pub fn invalidate(&mut self) {
        self.address.clear();
    }

    /// Whether this record has been invalidated.
    pub fn is_invalidated(&self) -> bool {
        self.address.is_empty()
    }
}

fn generate_message(address: &str, timestamp: &str) -> String {
    format!("{address}:{timestamp}:{MESSAGE_SUFFIX}")
}

fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs() as i64
}
