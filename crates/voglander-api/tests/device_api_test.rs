#![allow(clippy::unwrap_used)]
// Integration tests for `DeviceApi` using wiremock.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voglander_api::{
    ApiClient, Device, DeviceApi, DeviceId, Error, MemoryTokenStore, RecordingNavigator,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceApi) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Duration::from_secs(10),
        Arc::new(MemoryTokenStore::new()),
        Arc::new(RecordingNavigator::new()),
    );
    (server, DeviceApi::new(Arc::new(client)))
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "msg": "操作成功", "data": data }))
}

async fn single_request(server: &MockServer) -> wiremock::Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_by_id_substitutes_path() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/get/42"))
        .respond_with(ok(json!({ "id": 42, "name": "cam-42" })))
        .mount(&server)
        .await;

    let payload = api.get_by_id(&DeviceId::Int(42)).await.unwrap();

    assert_eq!(payload["data"]["name"], "cam-42");
    single_request(&server).await;
}

#[tokio::test]
async fn test_get_by_id_keeps_string_ids_verbatim() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/get/34020000001320000001"))
        .respond_with(ok(json!({ "deviceId": "34020000001320000001" })))
        .mount(&server)
        .await;

    let id: DeviceId = "34020000001320000001".parse().unwrap();
    let payload = api.get_by_id(&id).await.unwrap();
    assert_eq!(payload["data"]["deviceId"], "34020000001320000001");
}

#[tokio::test]
async fn test_get_by_id_keeps_leading_zeros() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/get/007"))
        .respond_with(ok(json!({ "id": "007" })))
        .expect(1)
        .mount(&server)
        .await;

    let id: DeviceId = "007".parse().unwrap();
    let payload = api.get_by_id(&id).await.unwrap();
    assert_eq!(payload["data"]["id"], "007");
}

#[tokio::test]
async fn test_get_by_entity_sends_fields_as_query() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/get"))
        .and(query_param("deviceId", "dev-1"))
        .and(query_param("status", "1"))
        .respond_with(ok(json!({ "id": 1 })))
        .mount(&server)
        .await;

    let filter = Device::new().with("deviceId", "dev-1").with("status", 1);
    let payload = api.get_by_entity(&filter).await.unwrap();
    assert_eq!(payload["data"]["id"], 1);
}

#[tokio::test]
async fn test_get_list_without_filter_has_no_query() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/list"))
        .respond_with(ok(json!([{ "id": 1 }, { "id": 2 }])))
        .mount(&server)
        .await;

    let payload = api.get_list(None).await.unwrap();
    assert_eq!(payload["data"].as_array().unwrap().len(), 2);

    let req = single_request(&server).await;
    assert!(req.url.query().is_none());
}

#[tokio::test]
async fn test_page_list_has_path_params_and_no_query() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/pageList/2/10"))
        .respond_with(ok(json!({ "records": [], "total": 0, "size": 10, "current": 2 })))
        .mount(&server)
        .await;

    api.get_page_list(2, 10).await.unwrap();

    let req = single_request(&server).await;
    assert_eq!(req.method.as_str(), "GET");
    assert!(req.url.query().is_none());
}

#[tokio::test]
async fn test_page_list_by_entity_carries_filter() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/pageListByEntity/1/20"))
        .and(query_param("name", "gate"))
        .respond_with(ok(json!({ "records": [{ "id": 9 }], "total": 1 })))
        .mount(&server)
        .await;

    let filter = Device::new().with("name", "gate");
    let payload = api
        .get_page_list_by_entity(1, 20, Some(&filter))
        .await
        .unwrap();
    assert_eq!(payload["data"]["total"], 1);
}

#[tokio::test]
async fn test_counts() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/count"))
        .respond_with(ok(json!(12)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/device/countByEntity"))
        .and(query_param("status", "1"))
        .respond_with(ok(json!(5)))
        .mount(&server)
        .await;

    assert_eq!(api.get_count().await.unwrap()["data"], 12);
    let filter = Device::new().with("status", 1);
    assert_eq!(api.get_count_by_entity(&filter).await.unwrap()["data"], 5);
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_insert_and_insert_batch_post_json() {
    let (server, api) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/device/insert"))
        .and(body_json(json!({ "deviceId": "d1", "name": "one" })))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/device/insertBatch"))
        .and(body_json(json!([{ "deviceId": "d2" }, { "deviceId": "d3" }])))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let one = Device::new().with("deviceId", "d1").with("name", "one");
    api.insert(&one).await.unwrap();

    let batch = vec![
        Device::new().with("deviceId", "d2"),
        Device::new().with("deviceId", "d3"),
    ];
    api.insert_batch(&batch).await.unwrap();
}

#[tokio::test]
async fn test_update_and_update_batch_put_json() {
    let (server, api) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/device/update"))
        .and(body_json(json!({ "id": 1, "name": "renamed" })))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/device/updateBatch"))
        .and(body_json(json!([{ "id": 1 }, { "id": 2 }])))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    api.update(&Device::new().with("id", 1).with("name", "renamed"))
        .await
        .unwrap();
    api.update_batch(&[Device::new().with("id", 1), Device::new().with("id", 2)])
        .await
        .unwrap();
}

// ── Deletes ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_by_id() {
    let (server, api) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/device/delete/7"))
        .respond_with(ok(json!(true)))
        .mount(&server)
        .await;

    api.delete_by_id(&DeviceId::Int(7)).await.unwrap();
    let req = single_request(&server).await;
    assert!(req.body.is_empty());
}

#[tokio::test]
async fn test_delete_by_entity_sends_body() {
    let (server, api) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/device/deleteByEntity"))
        .and(body_json(json!({ "deviceId": "d9" })))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    api.delete_by_entity(&Device::new().with("deviceId", "d9"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_batch_sends_id_array() {
    let (server, api) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/device/deleteIds"))
        .and(body_json(json!([1, 2, 3])))
        .respond_with(ok(json!(true)))
        .mount(&server)
        .await;

    let ids: Vec<DeviceId> = vec![1_i64.into(), 2_i64.into(), 3_i64.into()];
    api.delete_batch(&ids).await.unwrap();
    single_request(&server).await;
}

#[tokio::test]
async fn test_delete_batch_keeps_typed_ids() {
    let (server, api) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/device/deleteIds"))
        .and(body_json(json!(["007", "+5", 12])))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let ids: Vec<DeviceId> = ["007", "+5", "12"].into_iter().map(DeviceId::from).collect();
    api.delete_batch(&ids).await.unwrap();
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_is_returned_with_body() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/count"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "code": 500, "msg": "db down" })),
        )
        .mount(&server)
        .await;

    let err = api.get_count().await.unwrap_err();
    match err {
        Error::Status { status, ref body } => {
            assert_eq!(status, 500);
            assert_eq!(body["msg"], "db down");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (server, api) = setup().await;

    // No mock mounted: wiremock answers 404.
    let err = api.get_by_entity(&Device::new()).await.unwrap_err();
    assert!(err.is_not_found());

    let req = single_request(&server).await;
    assert!(req.url.query().is_none());
}
