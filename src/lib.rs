//! DCIM Cache - response cache and request gate for the asset management API
//!
//! Sits between call sites and the HTTP transport: derives canonical request
//! keys, keeps responses with per-entry TTLs, short-circuits repeated reads
//! and invalidates resource families on writes.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod transport;

pub use api::AppState;
pub use cache::{derive_key, Cache, CacheStats, Params};
pub use client::{ApiClient, Resource, ResourceKind};
pub use config::Config;
pub use error::{Error, Result};
pub use gate::RequestGate;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport, TransportError};
