//! Health, metrics and docs endpoint integration tests
//!
//! - GET /health - Status with provider details
//! - GET /health/live - Liveness probe
//! - GET /metrics - Prometheus exposition
//! - GET /docs/openapi.json - OpenAPI document

use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{constants::TEST_MODEL, create_test_server, unused_url};

#[tokio::test]
async fn test_health_endpoint_returns_proper_structure() {
    let server = create_test_server(&unused_url().await);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_u64());
    assert!(body["timestamp"].is_string());
    assert_eq!(body["provider"]["name"], "gemini");
    assert_eq!(body["provider"]["model"], TEST_MODEL);
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let server = create_test_server(&unused_url().await);

    let response = server.get("/health/live").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint_is_reachable() {
    let server = create_test_server(&unused_url().await);

    let response = server.get("/metrics").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_openapi_document_describes_generate() {
    let server = create_test_server(&unused_url().await);

    let response = server.get("/docs/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/generate"]["post"].is_object());
    assert!(body["components"]["schemas"]["GenerateRequest"].is_object());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let server = create_test_server(&unused_url().await);

    let response = server.get("/v1/chat/completions").await;

    response.assert_status(StatusCode::NOT_FOUND);
}
