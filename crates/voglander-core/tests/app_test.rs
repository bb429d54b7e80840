#![allow(clippy::unwrap_used)]
// End-to-end tests for `App` against a wiremock backend.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voglander_api::{MemoryTokenStore, RecordingNavigator, TokenStore};
use voglander_core::{App, AppConfig, CoreError, Mode};

// ── Helpers ─────────────────────────────────────────────────────────

struct Harness {
    server: MockServer,
    app: App,
    tokens: Arc<MemoryTokenStore>,
    navigator: Arc<RecordingNavigator>,
}

async fn harness(token: Option<&str>) -> Harness {
    let server = MockServer::start().await;
    let tokens = Arc::new(match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    });
    let navigator = Arc::new(RecordingNavigator::new());

    let mut config = AppConfig::new(Url::parse(&server.uri()).unwrap());
    config.title = "Voglander Test".into();
    config.mode = Mode::Development;
    config.env_base_url = Url::parse("http://localhost:8087").unwrap();

    let app = App::new(
        config,
        Arc::clone(&tokens) as Arc<dyn TokenStore>,
        Arc::clone(&navigator) as Arc<dyn voglander_api::Navigator>,
    )
    .unwrap();

    Harness {
        server,
        app,
        tokens,
        navigator,
    }
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "msg": "ok", "data": data }))
}

async fn mount_user_info(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/api/user/info"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ok(json!({
            "id": 1, "username": "admin", "realName": "Administrator", "roles": ["admin"]
        })))
        .mount(server)
        .await;
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_persists_token_and_loads_user() {
    let h = harness(None).await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ok(json!({ "accessToken": "jwt-1" })))
        .expect(1)
        .mount(&h.server)
        .await;
    mount_user_info(&h.server, "jwt-1").await;

    let user = h
        .app
        .login("admin", SecretString::from("123456"))
        .await
        .unwrap();

    assert_eq!(user.username(), Some("admin"));
    assert_eq!(h.tokens.get().unwrap().unwrap().expose_secret(), "jwt-1");
    assert!(h.app.user_store().is_authenticated());
    assert_eq!(h.app.user_store().user().as_deref(), Some(&user));
}

#[tokio::test]
async fn test_login_rejected_by_envelope_keeps_session_empty() {
    let h = harness(None).await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 500, "msg": "用户名或密码错误" })),
        )
        .mount(&h.server)
        .await;

    let err = h
        .app
        .login("admin", SecretString::from("wrong"))
        .await
        .unwrap_err();

    match err {
        CoreError::Rejected { code, message } => {
            assert_eq!(code, 500);
            assert_eq!(message, "用户名或密码错误");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
    assert!(h.tokens.get().unwrap().is_none());
    assert!(!h.app.user_store().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_token_and_store() {
    let h = harness(Some("jwt")).await;
    mount_user_info(&h.server, "jwt").await;

    h.app.refresh_user().await.unwrap();
    assert!(h.app.user_store().is_logged_in());

    h.app.logout().unwrap();
    assert!(h.tokens.get().unwrap().is_none());
    assert!(!h.app.user_store().is_logged_in());
    assert!(h.app.user_store().user().is_none());
    assert!(!h.app.has_token().unwrap());
}

#[tokio::test]
async fn test_expired_session_redirects_to_login() {
    let h = harness(Some("stale")).await;

    Mock::given(method("GET"))
        .and(path("/api/user/info"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let err = h.app.refresh_user().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(h.tokens.get().unwrap().is_none());
    assert_eq!(h.navigator.last().as_deref(), Some("/login"));
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_devices_fills_store_and_clears_loading() {
    let h = harness(Some("jwt")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/pageList/2/10"))
        .respond_with(ok(json!({
            "records": [{ "id": 11, "name": "gate" }, { "id": 12, "name": "lobby" }],
            "total": 12, "size": 10, "current": 2, "pages": 2
        })))
        .mount(&h.server)
        .await;

    let page = h.app.load_devices(2, 10).await.unwrap();

    assert_eq!(page.total, 12);
    assert_eq!(page.current, 2);
    assert!(Arc::ptr_eq(&page.devices, &h.app.device_store().devices()));
    assert_eq!(page.devices[1].text("name").as_deref(), Some("lobby"));
    assert!(!h.app.device_store().is_loading());
}

#[tokio::test]
async fn test_load_devices_failure_still_clears_loading() {
    let h = harness(Some("jwt")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/pageList/1/10"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "msg": "db down" })))
        .mount(&h.server)
        .await;

    let err = h.app.load_devices(1, 10).await.unwrap_err();
    assert!(matches!(err, CoreError::ServerError { status: 500, .. }));
    assert!(!h.app.device_store().is_loading());
    assert!(h.app.device_store().devices().is_empty());
}

#[tokio::test]
async fn test_load_device_list_accepts_bare_array() {
    let h = harness(None).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/list"))
        .respond_with(ok(json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }])))
        .mount(&h.server)
        .await;

    let devices = h.app.load_device_list(None).await.unwrap();
    assert_eq!(devices.len(), 3);
    assert_eq!(h.app.device_store().devices().len(), 3);
}

// ── Navigation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_home_and_about_render_without_network() {
    let h = harness(None).await;

    let home = h.app.navigate("/").await.unwrap();
    assert_eq!(
        home,
        format!(
            "Voglander Test\nMode:     development\nAPI base: {}/\nSession:  not signed in\nRoutes:   / /about /device /api-test",
            h.server.uri()
        )
    );

    let about = h.app.navigate("/about").await.unwrap();
    assert_eq!(
        about,
        format!(
            "About Voglander Test\nVersion:  {}\nBackend:  http://localhost:8087/",
            env!("CARGO_PKG_VERSION")
        )
    );
    assert!(h.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_device_route_loads_lazily_and_renders_page() {
    let h = harness(Some("jwt")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/pageList/1/10"))
        .respond_with(ok(json!({
            "records": [{ "id": 1, "name": "cam-1" }, { "id": 2, "deviceId": "3402" }],
            "total": 2, "size": 10, "current": 1, "pages": 1
        })))
        .mount(&h.server)
        .await;

    assert!(!h.app.routes().find("/device").unwrap().is_loaded());
    let out = h.app.navigate("/device").await.unwrap();
    assert!(h.app.routes().find("/device").unwrap().is_loaded());

    assert_eq!(
        out,
        "Devices (page 1, 2 of 2)\n       1  cam-1\n       2  3402"
    );
}

#[tokio::test]
async fn test_api_test_reports_each_probe() {
    let h = harness(None).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/device/count"))
        .respond_with(ok(json!(4)))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/device/list"))
        .respond_with(ok(json!([{ "id": 1 }])))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/info"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&h.server)
        .await;

    let out = h.app.navigate("/api-test").await.unwrap();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "[ok]   GET /api/v1/device/count: 4");
    assert_eq!(lines[2], "[ok]   GET /api/v1/device/list: 1 item(s)");
    assert!(lines[3].starts_with("[fail] GET /api/user/info: HTTP 403"));
}

#[tokio::test]
async fn test_unknown_route_is_router_error() {
    let h = harness(None).await;
    let err = h.app.navigate("/login").await.unwrap_err();
    assert!(matches!(err, CoreError::Router(_)));
}
