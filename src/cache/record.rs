//! Record Module
//!
//! Defines the value stored under a key, with optional expiry.

use std::time::{SystemTime, UNIX_EPOCH};

// == Record ==
/// A stored value plus its optional expiry.
///
/// Queues share the keyspace with plain strings: a queue is a record whose
/// value is a single-space-joined list of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The stored value
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), None = never expires
    pub expires_at: Option<u64>,
}

impl Record {
    // == Constructors ==
    /// Creates a record that never expires.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    /// Creates a record expiring `seconds` after `now`.
    ///
    /// Zero or negative durations produce a record that is already expired.
    pub fn expiring_in(value: impl Into<String>, seconds: i64, now: u64) -> Self {
        let expires_at = now.saturating_add_signed(seconds.saturating_mul(1000));

        Self {
            value: value.into(),
            expires_at: Some(expires_at),
        }
    }

    // == Liveness ==
    /// Returns true while the record has not reached its expiry.
    ///
    /// A record is dead from the millisecond it expires onwards. This is the
    /// only expiry predicate: lazy expiry, GET and the sweep all go through it.
    pub fn is_live(&self, now: u64) -> bool {
        match self.expires_at {
            Some(expires) => now < expires,
            None => true,
        }
    }

    /// Inverse of [`Record::is_live`].
    pub fn is_expired(&self, now: u64) -> bool {
        !self.is_live(now)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as 0.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
