mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tiny_shortener::domain::repositories::KeyValueStore;

const CLIENT: &str = "10.0.0.1:40000";

#[tokio::test]
async fn test_shorten_generates_code() {
    let (state, store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    let response = server
        .post("/api/v1")
        .json(&json!({ "url": "https://example.com/page" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let code = json["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(json["url"], "https://example.com/page");
    assert_eq!(json["short"], format!("sho.rt/{}", code));
    assert_eq!(json["expiry"], 24);
    assert_eq!(json["rate_limit"], 100);
    assert_eq!(json["rate_limit_reset"], 30);

    let stored = store.get(&format!("url:{}", code)).await.unwrap();
    assert_eq!(stored.as_deref(), Some("https://example.com/page"));
}

#[tokio::test]
async fn test_shorten_with_custom_code_and_expiry() {
    let (state, store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    let response = server
        .post("/api/v1")
        .json(&json!({
            "url": "example.com",
            "short": "my-link",
            "expiry": 2
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "my-link");
    assert_eq!(json["short"], "sho.rt/my-link");
    assert_eq!(json["url"], "https://example.com");
    assert_eq!(json["expiry"], 2);

    let ttl = store.ttl("url:my-link").await.unwrap().unwrap();
    assert!(ttl <= Duration::from_secs(2 * 3600));
    assert!(ttl > Duration::from_secs(3600));
}

#[tokio::test]
async fn test_shorten_zero_expiry_defaults_to_24_hours() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    let response = server
        .post("/api/v1")
        .json(&json!({ "url": "https://example.com", "expiry": 0 }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["expiry"], 24);
}

#[tokio::test]
async fn test_shorten_custom_code_in_use() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    let body = json!({ "url": "https://example.com", "short": "taken" });

    server.post("/api/v1").json(&body).await.assert_status_ok();

    let response = server.post("/api/v1").json(&body).await;
    response.assert_status(StatusCode::FORBIDDEN);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "identifier_in_use");
    assert!(json.get("rate_limit_reset").is_none());
}

#[tokio::test]
async fn test_shorten_code_in_use_does_not_consume_quota() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    let body = json!({ "url": "https://example.com", "short": "dup" });
    server.post("/api/v1").json(&body).await.assert_status_ok();
    server
        .post("/api/v1")
        .json(&body)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = server
        .post("/api/v1")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["rate_limit"], 99);
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let (state, store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    let response = server
        .post("/api/v1")
        .json(&json!({ "url": "not a url" }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_url");

    // Validation failures never open a quota window.
    assert!(store.get("quota:10.0.0.1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_shorten_forbidden_domain() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    for url in ["https://sho.rt/abc", "http://www.blocked.example/x"] {
        let response = server.post("/api/v1").json(&json!({ "url": url })).await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<serde_json::Value>()["error"]["code"],
            "forbidden_domain"
        );
    }
}

#[tokio::test]
async fn test_shorten_malformed_json() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    let response = server
        .post("/api/v1")
        .content_type("application/json")
        .text("{\"url\": ")
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_input");
    assert_eq!(json["error"]["message"], "Cannot parse JSON");
}

#[tokio::test]
async fn test_shorten_invalid_custom_code() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    let response = server
        .post("/api/v1")
        .json(&json!({ "url": "https://example.com", "short": "a/b" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "invalid_input"
    );
}

#[tokio::test]
async fn test_shorten_rate_limit_exceeded() {
    let (state, _store) = common::create_test_state(2);
    let server = common::server_from(state, CLIENT);

    // The call that opens the window does not consume a unit.
    for expected in [2, 1, 0] {
        let response = server
            .post("/api/v1")
            .json(&json!({ "url": "https://example.com" }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>()["rate_limit"], expected);
    }

    let response = server
        .post("/api/v1")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = response
        .header("retry-after")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 1800);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "rate_limit_exceeded");
    assert_eq!(json["rate_limit_reset"], 30);
    assert!(json["error"].get("rate_limit_reset").is_none());
}

#[tokio::test]
async fn test_shorten_quota_is_per_client() {
    let (state, _store) = common::create_test_state(1);
    let first = common::server_from(state.clone(), "10.0.0.1:1000");
    let second = common::server_from(state, "10.0.0.2:1000");

    for _ in 0..2 {
        first
            .post("/api/v1")
            .json(&json!({ "url": "https://example.com" }))
            .await
            .assert_status_ok();
    }
    first
        .post("/api/v1")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    let response = second
        .post("/api/v1")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["rate_limit"], 1);
}

#[tokio::test]
async fn test_shorten_source_port_does_not_reset_quota() {
    let (state, store) = common::create_test_state(100);

    for port in ["10.0.0.9:1000", "10.0.0.9:2000"] {
        common::server_from(state.clone(), port)
            .post("/api/v1")
            .json(&json!({ "url": "https://example.com" }))
            .await
            .assert_status_ok();
    }

    let counter = store.get("quota:10.0.0.9").await.unwrap();
    assert_eq!(counter.as_deref(), Some("99"));
}

#[tokio::test]
async fn test_shorten_uses_forwarded_client_behind_proxy() {
    let store = tiny_shortener::infrastructure::store::MemoryStore::new();
    let state = common::create_state_with(Arc::new(store.clone()), true);
    let server = common::server_from(state, "127.0.0.1:5000");

    server
        .post("/api/v1")
        .add_header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status_ok();

    assert!(store.get("quota:203.0.113.9").await.unwrap().is_some());
    assert!(store.get("quota:127.0.0.1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_shorten_store_unavailable() {
    let state = common::create_state_with(Arc::new(common::UnreachableStore), false);
    let server = common::server_from(state, CLIENT);

    let response = server
        .post("/api/v1")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "store_unavailable"
    );
}

#[tokio::test]
async fn test_invalid_url_checked_before_store() {
    let state = common::create_state_with(Arc::new(common::UnreachableStore), false);
    let server = common::server_from(state, CLIENT);

    let response = server
        .post("/api/v1")
        .json(&json!({ "url": "mailto:someone@example.com" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "invalid_url"
    );
}

#[tokio::test]
async fn test_shorten_accepts_trailing_slash() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    let response = server
        .post("/api/v1/")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["rate_limit"], 100);
}

#[tokio::test]
async fn test_shorten_oversized_expiry_rejected() {
    let (state, store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    let response = server
        .post("/api/v1")
        .json(&json!({ "url": "https://example.com", "expiry": 87_601 }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "invalid_input"
    );
    assert!(store.get("quota:10.0.0.1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (state, _store) = common::create_test_state(100);
    let server = common::server_from(state, CLIENT);

    server
        .post("/api/v2")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status_not_found();
}
