//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::time::Duration;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: u64,
    /// Base URL of the backend REST API
    pub upstream_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Upstream request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `UPSTREAM_URL` - Backend base URL (default: http://127.0.0.1:8080)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REQUEST_TIMEOUT_SECS` - Upstream timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl_ms: parse_var("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_ms: 300_000,
            upstream_url: "http://127.0.0.1:8080".to_string(),
            server_port: 3000,
            request_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.default_ttl(), Duration::from_secs(300));
        assert_eq!(config.upstream_url, "http://127.0.0.1:8080");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("DEFAULT_TTL_MS");
        env::remove_var("UPSTREAM_URL");
        env::remove_var("SERVER_PORT");
        env::remove_var("REQUEST_TIMEOUT_SECS");

        let config = Config::from_env();
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.upstream_url, "http://127.0.0.1:8080");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.request_timeout_secs, 30);
    }
}
