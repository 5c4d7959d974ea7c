use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{body_json, get, send, setup};

#[tokio::test]
async fn health_check_reports_service_status() {
    let app = setup();

    let response = send(&app, get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Task board API is running"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn unmatched_route_returns_the_error_envelope() {
    let app = setup();

    let response = send(&app, get("/definitely/not/a/route")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body, json!({"success": false, "error": "Route not found"}));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup();

    let response = send(&app, get("/openapi.json")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body.get("openapi").is_some());
    assert!(body["paths"].get("/tasks").is_some());
}
