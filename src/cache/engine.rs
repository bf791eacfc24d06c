//! Cache Engine Module
//!
//! The session-wide response cache: key derivation, TTL overrides,
//! invalidation and the satisfied set used by the request gate.
//!
//! Every operation takes the single internal lock once and never awaits
//! while holding it, so callers observe each operation as a whole.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use regex::Regex;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{derive_key, CacheStats, Clock, ExpiryStore, Params, SystemClock};
use crate::error::{Error, Result};

/// Global TTL when none is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct CacheState {
    store: ExpiryStore,
    /// Scope -> TTL applied to new entries under that scope
    ttl_overrides: HashMap<String, Duration>,
    /// Keys whose cached response may be served without dispatch
    satisfied: HashSet<String>,
}

impl CacheState {
    fn resolve_ttl(&self, key: &str, path: &str) -> Option<Duration> {
        self.ttl_overrides
            .iter()
            .filter(|(scope, _)| {
                key.starts_with(scope.as_str()) || path.starts_with(scope.as_str())
            })
            .max_by_key(|(scope, _)| scope.len())
            .map(|(_, ttl)| *ttl)
    }
}

// == Cache ==
/// Shared handle to one cache instance.
///
/// Clones point at the same state; build one per client session and hand
/// clones to whatever needs it.
#[derive(Debug, Clone)]
pub struct Cache {
    state: Arc<Mutex<CacheState>>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Cache {
    // == Constructor ==
    /// Creates a cache on the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates a cache on a custom clock.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                store: ExpiryStore::new(default_ttl, clock),
                ttl_overrides: HashMap::new(),
                satisfied: HashSet::new(),
            })),
        }
    }

    // == Get ==
    /// Looks up a cached response.
    ///
    /// Expired entries are evicted here and reported as absent.
    pub fn get(&self, method: &Method, url: &str, params: Option<&Params>) -> Option<Value> {
        let key = derive_key(method, url, params);
        self.get_by_key(&key)
    }

    /// Looks up a cached response by precomputed key.
    pub fn get_by_key(&self, key: &str) -> Option<Value> {
        let mut state = self.state.lock();
        let value = state.store.get(key);

        match &value {
            Some(_) => debug!(key, "cache hit"),
            None => {
                state.satisfied.remove(key);
                debug!(key, "cache miss");
            }
        }

        value
    }

    // == Set ==
    /// Stores or refreshes a response and returns its key.
    ///
    /// TTL resolution: `ttl`, then the longest matching scope override, then
    /// the global default.
    pub fn set(
        &self,
        method: &Method,
        url: &str,
        params: Option<&Params>,
        value: Value,
        ttl: Option<Duration>,
    ) -> String {
        let key = derive_key(method, url, params);
        let mut state = self.state.lock();

        let ttl = ttl.or_else(|| state.resolve_ttl(&key, url));
        let stored_ttl = state.store.put(key.clone(), value, ttl);
        debug!(key = %key, ttl_ms = stored_ttl.as_millis() as u64, "cache set");

        key
    }

    // == Invalidate ==
    /// Removes every entry whose key contains `substring`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&self, substring: &str) -> usize {
        let mut state = self.state.lock();
        let removed = state.store.remove_where(|key| key.contains(substring));
        state.satisfied.retain(|key| !key.contains(substring));

        info!(substring, removed = removed.len(), "cache invalidated");
        removed.len()
    }

    // == Invalidate Pattern ==
    /// Removes every entry whose key matches the regular expression.
    ///
    /// Fails with [`Error::InvalidPattern`] before touching any state if the
    /// pattern does not compile.
    pub fn invalidate_pattern(&self, pattern: &str) -> Result<usize> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut state = self.state.lock();
        let removed = state.store.remove_where(|key| regex.is_match(key));
        state.satisfied.retain(|key| !regex.is_match(key));

        info!(pattern, removed = removed.len(), "cache invalidated by pattern");
        Ok(removed.len())
    }

    // == Clear ==
    /// Empties all entries, satisfied markers and counters.
    ///
    /// TTL overrides are configuration and survive a clear.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.store.clear();
        state.satisfied.clear();
        info!("cache cleared");
    }

    // == Set TTL ==
    /// Registers a TTL override for every future entry under `scope`.
    ///
    /// A scope matches a key that starts with it, or a request path that
    /// starts with it. Entries already stored keep their TTL.
    pub fn set_ttl(&self, scope: impl Into<String>, ttl: Duration) {
        let scope = scope.into();
        info!(scope = %scope, ttl_ms = ttl.as_millis() as u64, "ttl override registered");
        self.state.lock().ttl_overrides.insert(scope, ttl);
    }

    /// Registers a TTL override unless `scope` already has one.
    ///
    /// Returns true if the override was added.
    pub fn set_ttl_if_absent(&self, scope: impl Into<String>, ttl: Duration) -> bool {
        let scope = scope.into();
        let mut state = self.state.lock();
        if state.ttl_overrides.contains_key(&scope) {
            return false;
        }
        debug!(
            scope = %scope,
            ttl_ms = ttl.as_millis() as u64,
            "default ttl override registered"
        );
        state.ttl_overrides.insert(scope, ttl);
        true
    }

    /// Returns the TTL override that applies to `key`/`path`, if any.
    pub fn ttl_override(&self, key: &str, path: &str) -> Option<Duration> {
        self.state.lock().resolve_ttl(key, path)
    }

    // == Stats ==
    /// Returns a snapshot of keys and counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats::new(state.store.keys(), state.store.counters())
    }

    /// Returns the stored TTL of a key, expired or not.
    pub fn entry_ttl(&self, key: &str) -> Option<Duration> {
        self.state.lock().store.entry(key).map(|entry| entry.ttl)
    }

    // == Satisfied Set ==
    /// Returns the cached value for a satisfied key, or `None`.
    ///
    /// A satisfied key whose entry has expired or vanished loses its marker
    /// here and the expired entry is evicted.
    pub fn satisfied_value(&self, key: &str) -> Option<Value> {
        let mut state = self.state.lock();
        if !state.satisfied.contains(key) {
            return None;
        }

        if state.store.has_expired(key) {
            state.satisfied.remove(key);
            // Lazy eviction of the stale entry, counted as a miss
            state.store.get(key);
            return None;
        }

        state.store.get(key)
    }

    /// Stores a dispatched response and marks its key satisfied in one step.
    pub fn fill(&self, key: &str, path: &str, value: Value, ttl: Option<Duration>) {
        let mut state = self.state.lock();
        let ttl = ttl.or_else(|| state.resolve_ttl(key, path));
        state.store.put(key.to_string(), value, ttl);
        state.satisfied.insert(key.to_string());
    }

    /// Drops the satisfied marker for a key.
    pub fn unmark(&self, key: &str) {
        self.state.lock().satisfied.remove(key);
    }

    /// Returns true if the key is currently marked satisfied.
    pub fn is_satisfied(&self, key: &str) -> bool {
        self.state.lock().satisfied.contains(key)
    }
}
