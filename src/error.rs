//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::transport::TransportError;

// == Error Enum ==
/// Unified error type for the cache layer and gateway.
///
/// A cache miss is not an error; lookups return `None`.
#[derive(Error, Debug)]
pub enum Error {
    /// Regular expression passed to pattern invalidation did not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Transport failure, carried unchanged
    #[error(transparent)]
    Network(#[from] TransportError),

    /// Response payload did not match the type the call site asked for
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Malformed gateway request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidPattern { .. } | Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Network(TransportError::Status { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Error::Network(_) | Error::Decode(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, Error>;
