//! Integration Tests for the HTTP transport and resource client
//!
//! Runs the full stack (resource client, request gate, reqwest transport)
//! against a mock backend.

use std::time::Duration;

use dcim_cache::{
    cache::Cache,
    transport::{HttpTransport, MultipartForm},
    ApiClient, Error, Params, ResourceKind, TransportError,
};
use httpmock::prelude::*;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

#[derive(Debug, Deserialize, PartialEq)]
struct Consumable {
    id: u32,
    name: String,
    stock: u32,
}

fn client_for(server: &MockServer) -> ApiClient<HttpTransport> {
    let base_url = Url::parse(&server.base_url()).unwrap();
    let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();
    ApiClient::new(transport, Cache::default())
}

#[tokio::test]
async fn test_list_is_fetched_once() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/consumables");
            then.status(200)
                .json_body(json!([{"id": 1, "name": "SFP+ module", "stock": 40}]));
        })
        .await;
    let client = client_for(&server);
    let consumables = client.resource(ResourceKind::Consumables);

    let first: Vec<Consumable> = consumables.list(Params::new()).await.unwrap();
    let second: Vec<Consumable> = consumables.list(Params::new()).await.unwrap();

    mock.assert_hits_async(1).await;
    assert_eq!(first, second);
    assert_eq!(first[0].stock, 40);
}

#[tokio::test]
async fn test_query_params_are_forwarded() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/tickets")
                .query_param("status", "open")
                .query_param("page", "2");
            then.status(200).json_body(json!({"items": [], "page": 2}));
        })
        .await;
    let client = client_for(&server);

    let mut params = Params::new();
    params.insert("status".to_string(), json!("open"));
    params.insert("page".to_string(), json!(2));
    let page: Value = client
        .resource(ResourceKind::Tickets)
        .list(params)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page["page"], 2);
}

#[tokio::test]
async fn test_create_forces_next_list_to_refetch() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/devices");
            then.status(200).json_body(json!([]));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/devices")
                .json_body(json!({"name": "leaf-03"}));
            then.status(201).json_body(json!({"id": 3, "name": "leaf-03"}));
        })
        .await;
    let client = client_for(&server);
    let devices = client.resource(ResourceKind::Devices);

    let _: Value = devices.list(Params::new()).await.unwrap();
    let created: Value = devices.create(&json!({"name": "leaf-03"})).await.unwrap();
    let _: Value = devices.list(Params::new()).await.unwrap();

    create.assert_async().await;
    list.assert_hits_async(2).await;
    assert_eq!(created["id"], 3);
}

#[tokio::test]
async fn test_concurrent_identical_reads_both_reach_backend() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/racks");
            then.status(200)
                .delay(Duration::from_millis(100))
                .json_body(json!([{"id": 1}]));
        })
        .await;
    let client = client_for(&server);
    let racks = client.resource(ResourceKind::Racks);

    let (a, b) = tokio::join!(
        racks.list::<Value>(Params::new()),
        racks.list::<Value>(Params::new())
    );

    assert_eq!(a.unwrap(), b.unwrap());
    mock.assert_hits_async(2).await;

    // Once settled, the next read is a cache hit.
    let _: Value = racks.list(Params::new()).await.unwrap();
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_error_status_propagates_and_is_not_cached() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/rooms/9");
            then.status(404).body("no such room");
        })
        .await;
    let client = client_for(&server);
    let rooms = client.resource(ResourceKind::Rooms);

    for _ in 0..2 {
        let err = rooms.get::<Value>(9).await.unwrap_err();
        match err {
            Error::Network(TransportError::Status { status, body, .. }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "no such room");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    mock.assert_hits_async(2).await;
    assert_eq!(client.cache().stats().entry_count, 0);
}

#[tokio::test]
async fn test_export_returns_binary_and_bypasses_cache() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/devices/export");
            then.status(200)
                .header("content-type", "application/vnd.ms-excel")
                .body(b"\xd0\xcf\x11\xe0");
        })
        .await;
    let client = client_for(&server);
    let devices = client.resource(ResourceKind::Devices);

    let first = devices.export(Params::new()).await.unwrap();
    let second = devices.export(Params::new()).await.unwrap();

    assert_eq!(&first[..], b"\xd0\xcf\x11\xe0");
    assert_eq!(first, second);
    mock.assert_hits_async(2).await;
    assert_eq!(client.cache().stats().entry_count, 0);
}

#[tokio::test]
async fn test_import_uploads_multipart() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/devices/import")
                .body_contains("devices.csv")
                .body_contains("core-sw-01");
            then.status(200).json_body(json!({"imported": 1}));
        })
        .await;
    let client = client_for(&server);

    let form = MultipartForm::new().file(
        "file",
        "devices.csv",
        "text/csv",
        "name,rack\ncore-sw-01,R01\n",
    );
    let result = client
        .resource(ResourceKind::Devices)
        .import(form)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result, json!({"imported": 1}));
}

#[tokio::test]
async fn test_ttl_override_applies_to_reads() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/consumables");
            then.status(200).json_body(json!([]));
        })
        .await;
    let client = client_for(&server);
    client
        .cache()
        .set_ttl("/consumables", Duration::from_millis(60_000));

    client
        .read("/consumables", Params::new(), None)
        .await
        .unwrap();

    assert_eq!(
        client.cache().entry_ttl("GET:/consumables:"),
        Some(Duration::from_millis(60_000))
    );
}
