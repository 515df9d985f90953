mod common;

use axum::http::StatusCode;
use std::sync::Arc;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, "127.0.0.1:9000");

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["store"]["backend"], "memory");
    assert_eq!(json["checks"]["store"]["message"], "memory connected");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, "127.0.0.1:9000");

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("store").is_some());
}

#[tokio::test]
async fn test_health_endpoint_store_down() {
    let state = common::create_state_with(Arc::new(common::UnreachableStore), false);
    let server = common::server_from(state, "127.0.0.1:9000");

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["store"]["status"], "error");
    assert_eq!(json["checks"]["store"]["backend"], "redis");
}

#[tokio::test]
async fn test_health_endpoint_trailing_slash() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, "127.0.0.1:9000");

    server.get("/health/").await.assert_status_ok();
}
