//! Resource Client
//!
//! Typed entry point used by call sites. Reads go cache-first through the
//! request gate; writes dispatch directly and then invalidate every cached
//! read of the affected resource family.

mod resource;

use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::cache::{derive_key, Cache, Params};
use crate::error::Result;
use crate::gate::RequestGate;
use crate::transport::{ApiRequest, RequestBody, ResponseData, Transport};

pub use resource::{Resource, ResourceKind};

/// Client for the asset management REST API.
#[derive(Debug)]
pub struct ApiClient<T> {
    gate: RequestGate<T>,
}

impl<T: Transport> ApiClient<T> {
    /// Wraps `transport` in a request gate backed by `cache`.
    ///
    /// Each built-in resource's TTL is registered as a scope override,
    /// unless the cache already carries one for that scope. Later
    /// `set_ttl` calls replace them.
    pub fn new(transport: T, cache: Cache) -> Self {
        for kind in ResourceKind::ALL {
            cache.set_ttl_if_absent(kind.path(), kind.ttl());
        }
        Self {
            gate: RequestGate::new(transport, cache),
        }
    }

    pub fn cache(&self) -> &Cache {
        self.gate.cache()
    }

    /// Handle for one of the built-in resources.
    pub fn resource(&self, kind: ResourceKind) -> Resource<'_, T> {
        Resource::new(self, kind.path())
    }

    /// Handle for an arbitrary resource path.
    ///
    /// `ttl` becomes the path's scope override unless one is already set.
    pub fn resource_at(&self, path: impl Into<String>, ttl: Duration) -> Resource<'_, T> {
        let path = path.into();
        self.cache().set_ttl_if_absent(path.clone(), ttl);
        Resource::new(self, path)
    }

    // == Read ==
    /// Cache-first GET.
    ///
    /// `ttl` of `None` defers to the cache's overrides and default.
    pub async fn read(&self, path: &str, params: Params, ttl: Option<Duration>) -> Result<Value> {
        into_value(self.fetch(path, params, ttl).await?)
    }

    /// Cache-first GET returning the payload as received.
    ///
    /// JSON payloads are cached; binary payloads pass through uncached.
    pub async fn fetch(
        &self,
        path: &str,
        params: Params,
        ttl: Option<Duration>,
    ) -> Result<ResponseData> {
        let key = derive_key(&Method::GET, path, Some(&params));
        if let Some(value) = self.cache().get_by_key(&key) {
            return Ok(ResponseData::Json(value));
        }

        let mut request = ApiRequest::get(path).with_params(params);
        if let Some(ttl) = ttl {
            request = request.with_ttl(ttl);
        }

        let response = self.gate.send(request).await?;
        Ok(response.data)
    }

    // == Write ==
    /// Dispatches a mutating request, then invalidates every cached key
    /// containing `scope`.
    ///
    /// Resolves only once invalidation has been applied. A failed write
    /// leaves the cache untouched.
    pub async fn write(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        scope: &str,
    ) -> Result<ResponseData> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;

        let response = self.gate.send(request).await?;
        let removed = self.cache().invalidate(scope);
        debug!(path, scope, removed, "write invalidated cached reads");

        Ok(response.data)
    }

    // == Download ==
    /// GET that never touches the cache, returning the raw payload.
    pub async fn download(&self, path: &str, params: Params) -> Result<Bytes> {
        let request = ApiRequest::get(path).with_params(params).bypass_cache();
        let response = self.gate.send(request).await?;
        Ok(response.data.into_bytes())
    }
}

fn into_value(data: ResponseData) -> Result<Value> {
    match data {
        ResponseData::Json(value) => Ok(value),
        ResponseData::Binary(bytes) if bytes.is_empty() => Ok(Value::Null),
        ResponseData::Binary(bytes) => Ok(serde_json::from_slice(&bytes)?),
    }
}

fn decode<R: DeserializeOwned>(data: ResponseData) -> Result<R> {
    Ok(serde_json::from_value(into_value(data)?)?)
}
