use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use taskboard_server::config::Config;
use taskboard_server::store::{DocumentStore, InMemoryStore};
use taskboard_server::web::AppState;
use taskboard_server::web::api::create_api_router;

pub const TASKS_TABLE: &str = "tasks";
pub const BOARDS_TABLE: &str = "boards";

/// Test context: the assembled router plus direct store access for seeding.
pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
}

/// Builds the app over a fresh in-memory store.
pub fn setup() -> TestApp {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let store = InMemoryStore::new([TASKS_TABLE, BOARDS_TABLE]);
    let config = Config {
        port: 0,
        region: "local".to_string(),
        tasks_table: TASKS_TABLE.to_string(),
        boards_table: BOARDS_TABLE.to_string(),
    };
    let state = Arc::new(AppState {
        config: Arc::new(config),
        store: Arc::new(store.clone()),
    });
    TestApp {
        router: create_api_router(state),
        store,
    }
}

/// Sends a request through the app. The router is cloned so a test can issue
/// several requests against the same store.
pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

/// Builds a GET request.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Builds a DELETE request.
pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Builds a request with a JSON body.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Reads the response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Seeds a board document directly through the store.
pub async fn seed_board(app: &TestApp, id: &str, name: &str) {
    let document = serde_json::json!({"id": id, "name": name});
    app.store
        .put_item(BOARDS_TABLE, document.as_object().cloned().unwrap())
        .await
        .unwrap();
}

/// Creates a task through the API and returns the task JSON.
pub async fn create_task(app: &TestApp, body: Value) -> Value {
    let response = send(app, json_request(Method::POST, "/tasks", body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["task"].clone()
}
