use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::ToSchema;

use crate::config::Config;
use crate::store::{DocumentStore, InMemoryStore};
use crate::web::api::ErrorResponse;

pub mod api;

/// Shared application state handed to every router.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
}

/// Starts the HTTP server and serves requests until the process exits.
#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let store = InMemoryStore::new([config.tasks_table.clone(), config.boards_table.clone()]);
    tracing::info!(
        region = %config.region,
        tasks_table = %config.tasks_table,
        boards_table = %config.boards_table,
        "Document store ready"
    );

    let state = Arc::new(AppState {
        config: Arc::new(config),
        store: Arc::new(store),
    });

    let app = api::create_api_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// API response for the health check.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always true
    success: bool,
    /// Human-readable status line
    message: String,
    /// Server time at the moment of the check
    timestamp: DateTime<Utc>,
    /// Version of the running service
    version: String,
}

/// Handler for GET /health - liveness check.
#[tracing::instrument]
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Task board API is running".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback handler for requests that match no route.
#[tracing::instrument]
pub async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Route not found")),
    )
}
