//! Request Gate
//!
//! Middleware in front of a [`Transport`] that answers repeated reads from
//! the cache.
//!
//! Only sequential repeats are collapsed: a read issued while an identical
//! one is still in flight finds nothing satisfied and goes to the transport
//! as well. In-flight requests are never joined.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::transport::{ApiRequest, ApiResponse, ResponseData, Transport, TransportError};

/// Header set on responses synthesized from the cache.
pub const CACHE_HEADER: &str = "x-cache";

/// Caching middleware wrapping a transport.
#[derive(Debug)]
pub struct RequestGate<T> {
    inner: T,
    cache: Cache,
}

impl<T: Transport> RequestGate<T> {
    pub fn new(inner: T, cache: Cache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }
}

#[async_trait]
impl<T: Transport> Transport for RequestGate<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        if !request.is_cacheable_read() {
            return self.inner.send(request).await;
        }

        let key = request.cache_key();
        if let Some(value) = self.cache.satisfied_value(&key) {
            debug!(key = %key, "serving read from cache");
            return Ok(ApiResponse::ok(request, ResponseData::Json(value))
                .with_header(CACHE_HEADER, "hit"));
        }

        let path = request.path.clone();
        let ttl = request.ttl;
        match self.inner.send(request).await {
            Ok(response) => {
                if let Some(value) = response.data.as_json() {
                    self.cache.fill(&key, &path, value.clone(), ttl);
                }
                Ok(response)
            }
            Err(err) => {
                // A racing duplicate may have marked the key meanwhile.
                self.cache.unmark(&key);
                warn!(key = %key, error = %err, "read dispatch failed");
                Err(err)
            }
        }
    }
}
