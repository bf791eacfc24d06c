//! Request DTOs for the cache gateway API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /cache/invalidate
///
/// Exactly one of `substring` or `pattern` must be given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateRequest {
    /// Remove every key containing this text
    #[serde(default)]
    pub substring: Option<String>,
    /// Remove every key matching this regular expression
    #[serde(default)]
    pub pattern: Option<String>,
}

/// What an [`InvalidateRequest`] asks for, once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidateTarget {
    Substring(String),
    Pattern(String),
}

impl InvalidateRequest {
    /// Resolves the request into a single target.
    ///
    /// Returns an error message if neither or both selectors are set.
    pub fn target(self) -> Result<InvalidateTarget, String> {
        match (self.substring, self.pattern) {
            (Some(substring), None) => Ok(InvalidateTarget::Substring(substring)),
            (None, Some(pattern)) => Ok(InvalidateTarget::Pattern(pattern)),
            (None, None) => Err("Either 'substring' or 'pattern' is required".to_string()),
            (Some(_), Some(_)) => Err("Only one of 'substring' or 'pattern' may be set".to_string()),
        }
    }
}

/// Request body for PUT /cache/ttl
#[derive(Debug, Clone, Deserialize)]
pub struct TtlRequest {
    /// Key or path prefix the override applies to
    pub scope: String,
    /// TTL in milliseconds
    pub ttl_ms: u64,
}

impl TtlRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.scope.is_empty() {
            return Some("Scope cannot be empty".to_string());
        }
        None
    }
}
