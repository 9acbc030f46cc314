//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// Serialized as `{ value, expiresAfter, lastUpdated }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored value, `Null` when absent
    #[serde(default)]
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    #[serde(rename = "lastUpdated", default)]
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds)
    #[serde(rename = "expiresAfter", default)]
    pub expires_at: i64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_ms` milliseconds from now.
    pub fn new(value: Value, ttl_ms: u64) -> Self {
        Self::inserted_at(value, ttl_ms, current_timestamp_ms())
    }

    /// Creates a cache entry as if it had been inserted at `now`.
    pub fn inserted_at(value: Value, ttl_ms: u64, now: i64) -> Self {
        let ttl = i64::try_from(ttl_ms).unwrap_or(i64::MAX);
        Self {
            value,
            created_at: now,
            expires_at: now.saturating_add(ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Checks expiry against an explicit clock value.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    // == Is Live ==
    /// An entry is live when it has not expired and holds a value.
    pub fn is_live_at(&self, now: i64) -> bool {
        !self.is_expired_at(now) && !self.value.is_null()
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        let remaining = self.expires_at.saturating_sub(current_timestamp_ms());
        u64::try_from(remaining).unwrap_or(0)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
