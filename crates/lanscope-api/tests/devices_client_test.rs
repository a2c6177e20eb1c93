#![allow(clippy::unwrap_used)]
// Integration tests for `DevicesClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lanscope_api::{DeviceStatus, DevicesClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DevicesClient) {
    let server = MockServer::start().await;
    let client = DevicesClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn device_json(id: i64, ip: &str, online: bool, authorized: bool) -> serde_json::Value {
    json!({
        "id": id,
        "ipAddress": ip,
        "macAddress": format!("aa:bb:cc:dd:ee:{id:02x}"),
        "hostname": null,
        "vendor": "Acme",
        "status": if online { "ONLINE" } else { "OFFLINE" },
        "isAuthorized": authorized,
        "firstSeen": "2024-06-15T10:30:00Z",
        "lastSeen": "2024-06-15T11:00:00Z"
    })
}

// ── Inventory ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            device_json(1, "192.168.1.10", true, true),
            device_json(2, "192.168.1.11", false, false),
        ])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id, 1);
    assert_eq!(devices[0].status, DeviceStatus::Online);
    assert_eq!(devices[1].ip_address, "192.168.1.11");
    assert!(!devices[1].is_authorized);
}

#[tokio::test]
async fn test_list_devices_preserves_server_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            device_json(3, "192.168.1.30", true, true),
            device_json(1, "192.168.1.10", true, true),
            device_json(2, "192.168.1.20", true, true),
        ])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    let ids: Vec<i64> = devices.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_list_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices/unauthorized"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([device_json(5, "192.168.1.99", true, false)])))
        .mount(&server)
        .await;

    let devices = client.list_unauthorized().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert!(!devices[0].is_authorized);
}

// ── Stats ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalDevices": 14,
            "onlineDevices": 9,
            "unauthorizedDevices": 2
        })))
        .mount(&server)
        .await;

    let stats = client.get_stats().await.unwrap();
    assert_eq!(stats.total_devices, 14);
    assert_eq!(stats.online_devices, 9);
    assert_eq!(stats.unauthorized_devices, 2);
}

// ── Scan ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_scan_network_returns_replacement_inventory() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/devices/scan"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(json!([device_json(8, "192.168.1.80", true, false)])))
        .mount(&server)
        .await;

    let devices = client.scan_network().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, 8);
}

#[tokio::test]
async fn test_scan_network_surfaces_backend_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/devices/scan"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "scanner busy"})),
        )
        .mount(&server)
        .await;

    let err = client.scan_network().await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "scanner busy");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Authorize ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_authorize_device_success_by_status_only() {
    let (server, client) = setup().await;

    // The backend echoes the updated device; the client must not care.
    Mock::given(method("PUT"))
        .and(path("/api/devices/42/authorize"))
        .respond_with(ResponseTemplate::new(200)
            .set_body_json(device_json(42, "192.168.1.42", true, true)))
        .mount(&server)
        .await;

    client.authorize_device(42).await.unwrap();
}

#[tokio::test]
async fn test_authorize_unknown_device_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/devices/999/authorize"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.authorize_device(999).await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
}

// ── Malformed bodies ────────────────────────────────────────────────

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert!(body.contains("not json")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_text_error_body_is_carried_through() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices/stats"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .mount(&server)
        .await;

    let err = client.get_stats().await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance window");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
