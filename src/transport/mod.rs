//! Transport Module
//!
//! Request/response model shared by the gate and the resource client, the
//! [`Transport`] seam, and an HTTP implementation over reqwest.

mod http_client;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

use crate::cache::{derive_key, Params};

pub use http_client::HttpTransport;

// == Transport Error ==
/// Failure reported by a transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Upstream answered with a non-success status
    #[error("HTTP {status} {status_text}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Connection, timeout or protocol failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Path could not be joined onto the base URL
    #[error("Invalid URL for '{path}': {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// Upstream declared JSON but sent something else
    #[error("Malformed JSON body: {0}")]
    Body(#[from] serde_json::Error),
}

// == Transport Trait ==
/// Sends one request and resolves with the normalized response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request).await
    }
}

// == Request Body ==
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartForm),
}

/// One field of a multipart upload.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Multipart payload used by bulk imports.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: Bytes::from(value.into()),
        });
        self
    }

    /// Adds a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
        });
        self
    }
}

// == Api Request ==
/// A request as seen by transports and middleware.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the transport's base URL, e.g. `/devices/7`
    pub path: String,
    pub params: Params,
    pub body: Option<RequestBody>,
    /// TTL to store a successful read under; `None` defers to the cache
    pub ttl: Option<Duration>,
    /// Never answer from, or write to, the cache
    pub skip_cache: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Params::new(),
            body: None,
            ttl: None,
            skip_cache: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn bypass_cache(mut self) -> Self {
        self.skip_cache = true;
        self
    }

    /// True for GET requests that may be answered from the cache.
    pub fn is_cacheable_read(&self) -> bool {
        self.method == Method::GET && !self.skip_cache
    }

    /// Canonical cache key of this request.
    pub fn cache_key(&self) -> String {
        derive_key(&self.method, &self.path, Some(&self.params))
    }
}

// == Response ==
/// Response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Json(Value),
    Binary(Bytes),
}

impl ResponseData {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(value) => Some(value),
            ResponseData::Binary(_) => None,
        }
    }

    /// Returns the payload as bytes, encoding JSON if needed.
    pub fn into_bytes(self) -> Bytes {
        match self {
            ResponseData::Binary(bytes) => bytes,
            ResponseData::Json(value) => Bytes::from(value.to_string()),
        }
    }
}

/// Normalized response handed back to callers.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub data: ResponseData,
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    /// The request that produced this response
    pub request: ApiRequest,
}

impl ApiResponse {
    /// A `200 OK` response with no headers.
    pub fn ok(request: ApiRequest, data: ResponseData) -> Self {
        Self {
            data,
            status: 200,
            status_text: "OK".to_string(),
            headers: BTreeMap::new(),
            request,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}
