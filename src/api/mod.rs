//! API Module
//!
//! HTTP handlers and routing for the cache gateway.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /cache/stats` - Cache keys and counters
//! - `POST /cache/invalidate` - Drop entries by substring or pattern
//! - `PUT /cache/ttl` - Register a TTL override for a scope
//! - `DELETE /cache` - Clear the cache
//! - `ANY /api/*path` - Forward to the backend through the cache

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
