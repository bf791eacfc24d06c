//! API Handlers
//!
//! HTTP request handlers for the cache gateway: cache administration plus
//! the forwarding endpoint that routes backend calls through the cache.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use url::Url;

use crate::cache::{Cache, Params};
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::requests::InvalidateTarget;
use crate::models::{
    ClearResponse, HealthResponse, InvalidateRequest, InvalidateResponse, StatsResponse,
    TtlRequest, TtlResponse,
};
use crate::transport::{HttpTransport, RequestBody, ResponseData, Transport};

/// Application state shared across all handlers.
///
/// One resource client, and through it one cache, for the whole gateway.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<ApiClient<Arc<dyn Transport>>>,
}

impl AppState {
    /// Creates a new AppState over the given transport and cache.
    pub fn new(transport: Arc<dyn Transport>, cache: Cache) -> Self {
        Self {
            client: Arc::new(ApiClient::new(transport, cache)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds an HTTP transport to the upstream and a cache with the
    /// configured default TTL.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.upstream_url)
            .map_err(|e| Error::InvalidRequest(format!("Invalid upstream URL: {}", e)))?;
        let transport = HttpTransport::new(base_url, config.request_timeout())?;
        let cache = Cache::new(config.default_ttl());
        Ok(Self::new(Arc::new(transport), cache))
    }

    pub fn cache(&self) -> &Cache {
        self.client.cache()
    }
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache().stats().into())
}

/// Handler for POST /cache/invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    let removed = match req.target().map_err(Error::InvalidRequest)? {
        InvalidateTarget::Substring(substring) => state.cache().invalidate(&substring),
        InvalidateTarget::Pattern(pattern) => state.cache().invalidate_pattern(&pattern)?,
    };

    Ok(Json(InvalidateResponse { removed }))
}

/// Handler for PUT /cache/ttl
pub async fn ttl_handler(
    State(state): State<AppState>,
    Json(req): Json<TtlRequest>,
) -> Result<Json<TtlResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }

    state
        .cache()
        .set_ttl(req.scope.clone(), Duration::from_millis(req.ttl_ms));

    Ok(Json(TtlResponse::new(req.scope, req.ttl_ms)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache().clear();
    Json(ClearResponse::cleared())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for ANY /api/*path
///
/// GETs are served cache-first; binary payloads come back as raw bytes and
/// are not cached. Every other method is forwarded and then invalidates the
/// resource family named by the first path segment. Bodies are forwarded as
/// JSON.
pub async fn forward_handler(
    State(state): State<AppState>,
    method: Method,
    Path(path): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
    body: Bytes,
) -> Result<Response> {
    let path = format!("/{}", path.trim_start_matches('/'));

    if method == Method::GET {
        let params: Params = query
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();
        let data = state.client.fetch(&path, params, None).await?;
        return Ok(into_http_response(data));
    }

    let scope = resource_scope(&path)
        .ok_or_else(|| Error::InvalidRequest("Write path must name a resource".to_string()))?;

    let body = if body.is_empty() {
        None
    } else {
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| Error::InvalidRequest(format!("Body is not valid JSON: {}", e)))?;
        Some(RequestBody::Json(value))
    };

    let data = state
        .client
        .write(method, &path, body, &scope)
        .await?;

    Ok(into_http_response(data))
}

fn into_http_response(data: ResponseData) -> Response {
    match data {
        ResponseData::Json(value) => Json(value).into_response(),
        ResponseData::Binary(bytes) => bytes.into_response(),
    }
}

/// `/devices/7/ports` -> `/devices`; `None` when there is no first segment.
fn resource_scope(path: &str) -> Option<String> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .filter(|first| !first.is_empty())
        .map(|first| format!("/{}", first))
}
