//! Response DTOs for the cache gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of entries held
    pub entry_count: usize,
    /// Keys of the entries held
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            entry_count: stats.entry_count,
            keys: stats.keys,
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            hit_rate,
        }
    }
}

/// Response body for POST /cache/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Number of entries removed
    pub removed: usize,
}

/// Response body for PUT /cache/ttl
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub message: String,
    pub scope: String,
    pub ttl_ms: u64,
}

impl TtlResponse {
    pub fn new(scope: impl Into<String>, ttl_ms: u64) -> Self {
        let scope = scope.into();
        Self {
            message: format!("TTL override for '{}' set to {}ms", scope, ttl_ms),
            scope,
            ttl_ms,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
