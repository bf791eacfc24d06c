//! Cache Statistics Module
//!
//! Tracks lookup counters and exposes the observability snapshot.

use serde::Serialize;

// == Counters ==
/// Running lookup counters kept by the cache core.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    /// Lookups served from a live entry
    pub hits: u64,
    /// Lookups that found nothing (never cached or expired)
    pub misses: u64,
    /// Entries evicted lazily because they expired
    pub expirations: u64,
}

impl Counters {
    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Expiration ==
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}

// == Cache Stats ==
/// Point-in-time view of the cache.
///
/// Carries keys and counters only. Cached values are never part of the
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of entries currently held
    pub entry_count: usize,
    /// Keys of the entries currently held, sorted
    pub keys: Vec<String>,
    /// Number of successful lookups
    pub hits: u64,
    /// Number of failed lookups
    pub misses: u64,
    /// Number of entries dropped lazily on an expired read
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from the current keys and counters.
    pub fn new(mut keys: Vec<String>, counters: Counters) -> Self {
        keys.sort();
        Self {
            entry_count: keys.len(),
            keys,
            hits: counters.hits,
            misses: counters.misses,
            expirations: counters.expirations,
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default_is_empty() {
        let stats = CacheStats::default();
        assert_eq!(stats.entry_count, 0);
        assert!(stats.keys.is_empty());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_stats_keys_sorted() {
        let stats = CacheStats::new(
            vec!["GET:/racks:".to_string(), "GET:/devices:".to_string()],
            Counters::default(),
        );
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.keys, vec!["GET:/devices:", "GET:/racks:"]);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut counters = Counters::default();
        counters.record_hit();
        counters.record_miss();
        let stats = CacheStats::new(Vec::new(), counters);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_record_expiration() {
        let mut counters = Counters::default();
        counters.record_expiration();
        counters.record_expiration();
        assert_eq!(counters.expirations, 2);
    }

    #[test]
    fn test_stats_serialize_has_no_values() {
        let stats = CacheStats::new(vec!["GET:/devices:".to_string()], Counters::default());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["entry_count"], 1);
        assert!(json.get("value").is_none());
        assert!(json.get("values").is_none());
    }
}
