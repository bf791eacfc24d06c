//! Per-resource helpers.

use std::fmt::Display;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{decode, into_value, ApiClient};
use crate::cache::Params;
use crate::error::Result;
use crate::transport::{MultipartForm, RequestBody, Transport};

// == Resource Kind ==
/// Resources exposed by the asset management backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Devices,
    Racks,
    Rooms,
    Consumables,
    Tickets,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Devices,
        ResourceKind::Racks,
        ResourceKind::Rooms,
        ResourceKind::Consumables,
        ResourceKind::Tickets,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Devices => "/devices",
            ResourceKind::Racks => "/racks",
            ResourceKind::Rooms => "/rooms",
            ResourceKind::Consumables => "/consumables",
            ResourceKind::Tickets => "/tickets",
        }
    }

    /// How long reads of this resource stay cached.
    ///
    /// Rooms and racks barely change; stock levels and tickets move fast.
    pub fn ttl(&self) -> Duration {
        match self {
            ResourceKind::Devices => Duration::from_secs(5 * 60),
            ResourceKind::Racks | ResourceKind::Rooms => Duration::from_secs(10 * 60),
            ResourceKind::Consumables => Duration::from_secs(60),
            ResourceKind::Tickets => Duration::from_secs(30),
        }
    }
}

// == Resource ==
/// CRUD, import and export for one resource family.
///
/// Reads are cached under the TTL override registered for the resource
/// path.
#[derive(Debug)]
pub struct Resource<'a, T> {
    client: &'a ApiClient<T>,
    path: String,
}

impl<'a, T: Transport> Resource<'a, T> {
    pub(super) fn new(client: &'a ApiClient<T>, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn item_path(&self, id: impl Display) -> String {
        format!("{}/{}", self.path, id)
    }

    /// Lists the collection, served from cache when possible.
    pub async fn list<R: DeserializeOwned>(&self, params: Params) -> Result<R> {
        let value = self.client.read(&self.path, params, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetches one item, served from cache when possible.
    pub async fn get<R: DeserializeOwned>(&self, id: impl Display) -> Result<R> {
        let value = self
            .client
            .read(&self.item_path(id), Params::new(), None)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn create<B, R>(&self, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let data = self
            .client
            .write(Method::POST, &self.path, Some(body), &self.path)
            .await?;
        decode(data)
    }

    pub async fn update<B, R>(&self, id: impl Display, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let data = self
            .client
            .write(Method::PUT, &self.item_path(id), Some(body), &self.path)
            .await?;
        decode(data)
    }

    pub async fn delete(&self, id: impl Display) -> Result<()> {
        self.client
            .write(Method::DELETE, &self.item_path(id), None, &self.path)
            .await?;
        Ok(())
    }

    /// Bulk upload. Never cached; drops cached reads afterwards since the
    /// collection changed.
    pub async fn import(&self, form: MultipartForm) -> Result<Value> {
        let data = self
            .client
            .write(
                Method::POST,
                &self.item_path("import"),
                Some(RequestBody::Multipart(form)),
                &self.path,
            )
            .await?;
        into_value(data)
    }

    /// Bulk download as raw bytes. Never cached.
    pub async fn export(&self, params: Params) -> Result<Bytes> {
        self.client.download(&self.item_path("export"), params).await
    }
}
