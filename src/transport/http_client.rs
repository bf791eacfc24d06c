//! HTTP transport over reqwest.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::{
    ApiRequest, ApiResponse, MultipartForm, RequestBody, ResponseData, Transport, TransportError,
};
use crate::cache::Params;

/// Sends requests to a REST backend rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Creates a transport with its own connection pool.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        // Appending keeps any path prefix on the base URL, unlike Url::join.
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|source| TransportError::InvalidUrl {
            path: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, url = %url, "dispatching request");

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .query(&query_pairs(&request.params));

        match &request.body {
            Some(RequestBody::Json(body)) => builder = builder.json(body),
            Some(RequestBody::Multipart(form)) => {
                builder = builder.multipart(to_reqwest_form(form)?)
            }
            None => {}
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let is_json = headers
            .get(CONTENT_TYPE.as_str())
            .is_some_and(|content_type| content_type.contains("json"));
        let body = response.bytes().await?;

        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        if !status.is_success() {
            warn!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                "upstream returned error status"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                status_text,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let data = if !is_json {
            ResponseData::Binary(body)
        } else if body.is_empty() {
            ResponseData::Json(Value::Null)
        } else {
            ResponseData::Json(serde_json::from_slice(&body)?)
        };

        Ok(ApiResponse {
            data,
            status: status.as_u16(),
            status_text,
            headers,
            request,
        })
    }
}

/// Flattens parameters into query pairs. Arrays repeat the name, nulls are
/// dropped, strings are sent unquoted.
fn query_pairs(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| (name.clone(), scalar(item))));
            }
            other => pairs.push((name.clone(), scalar(other))),
        }
    }
    pairs
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn to_reqwest_form(form: &MultipartForm) -> Result<Form, TransportError> {
    let mut out = Form::new();
    for part in &form.parts {
        let mut field = Part::bytes(part.data.to_vec());
        if let Some(file_name) = &part.file_name {
            field = field.file_name(file_name.clone());
        }
        if let Some(content_type) = &part.content_type {
            field = field.mime_str(content_type)?;
        }
        out = out.part(part.name.clone(), field);
    }
    Ok(out)
}
