//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use serde_json::Value;

// == Cache Entry ==
/// A cached response payload and its expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Canonical key the entry is stored under
    pub key: String,
    /// Opaque payload, never inspected by the cache
    pub value: Value,
    /// Insertion timestamp (Unix milliseconds)
    pub inserted_at: u64,
    /// Time to live, measured from `inserted_at`
    pub ttl: Duration,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped at `now_ms`.
    pub fn new(key: String, value: Value, now_ms: u64, ttl: Duration) -> Self {
        Self {
            key,
            value,
            inserted_at: now_ms,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is valid only while `now - inserted_at < ttl`, so it is
    /// expired from the exact moment the TTL has fully elapsed.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.age_ms(now_ms) >= self.ttl_ms()
    }

    fn age_ms(&self, now_ms: u64) -> u64 {
        // A clock that moved backwards yields age zero.
        now_ms.saturating_sub(self.inserted_at)
    }

    fn ttl_ms(&self) -> u64 {
        u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(ttl_ms: u64) -> CacheEntry {
        CacheEntry::new(
            "GET:/devices:".to_string(),
            json!({"items": []}),
            10_000,
            Duration::from_millis(ttl_ms),
        )
    }

    #[test]
    fn test_entry_creation() {
        let entry = entry(1_000);

        assert_eq!(entry.key, "GET:/devices:");
        assert_eq!(entry.value, json!({"items": []}));
        assert_eq!(entry.inserted_at, 10_000);
        assert!(!entry.is_expired(10_000));
    }

    #[test]
    fn test_entry_valid_before_ttl() {
        let entry = entry(1_000);
        assert!(!entry.is_expired(10_999));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = entry(1_000);
        assert!(entry.is_expired(11_000), "Entry should be expired at boundary");
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let entry = entry(0);
        assert!(entry.is_expired(10_000));
    }

    #[test]
    fn test_clock_moving_backwards() {
        let entry = entry(1_000);

        assert!(!entry.is_expired(9_000));
        assert!(!entry.is_expired(10_999));
    }
}
