//! Expiry Store Module
//!
//! HashMap-backed entry storage with per-entry TTL and lazy eviction.
//! Expired entries are only ever removed by the read that discovers them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheEntry, Clock, Counters};

// == Expiry Store ==
/// Entry storage keyed by canonical request key.
#[derive(Debug)]
pub struct ExpiryStore {
    /// Key-entry storage
    entries: HashMap<String, CacheEntry>,
    /// Lookup counters
    counters: Counters,
    /// TTL applied when a put carries none
    default_ttl: Duration,
    /// Time source for insertion stamps and expiry checks
    clock: Arc<dyn Clock>,
}

impl ExpiryStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL for entries stored without an explicit one
    /// * `clock` - Time source
    pub fn new(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            counters: Counters::default(),
            default_ttl,
            clock,
        }
    }

    // == Put ==
    /// Stores a value, overwriting any existing entry and restarting its TTL.
    ///
    /// Returns the TTL the entry was stored with.
    pub fn put(&mut self, key: String, value: Value, ttl: Option<Duration>) -> Duration {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(key.clone(), value, self.clock.now_ms(), ttl);
        self.entries.insert(key, entry);
        ttl
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// An expired entry is removed as a side effect and reported absent,
    /// exactly like a key that was never stored.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if self.has_expired(key) {
            if self.entries.remove(key).is_some() {
                self.counters.record_expiration();
            }
            self.counters.record_miss();
            return None;
        }

        self.counters.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Has Expired ==
    /// Returns true if the key holds no live entry.
    ///
    /// Keys that are not present count as expired.
    pub fn has_expired(&self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) => entry.is_expired(self.clock.now_ms()),
            None => true,
        }
    }

    // == Entry ==
    /// Returns the raw entry, expired or not, without touching counters.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Remove ==
    /// Removes an entry by key. Returns true if one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Remove Where ==
    /// Removes every entry whose key satisfies `pred`.
    ///
    /// Returns the removed keys.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| pred(key))
            .cloned()
            .collect();

        for key in &doomed {
            self.entries.remove(key);
        }

        doomed
    }

    // == Clear ==
    /// Drops every entry and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.counters = Counters::default();
    }

    // == Keys ==
    /// Returns the keys currently held, including not-yet-evicted expired ones.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Counters ==
    pub fn counters(&self) -> Counters {
        self.counters
    }

    // == Default TTL ==
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
