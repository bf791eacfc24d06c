//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{any, delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, forward_handler, health_handler, invalidate_handler, stats_handler,
    ttl_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, so browser pages can call the gateway directly
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .route("/cache/ttl", put(ttl_handler))
        .route("/cache", delete(clear_handler))
        .route("/api/*path", any(forward_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
