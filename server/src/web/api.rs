use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::store::StoreError;
use crate::task::TaskServiceError;
use crate::web::{AppState, health_check_handler, not_found_handler};
use crate::{board, dashboard, task};

/// JSON envelope for error responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false for error responses
    pub success: bool,
    /// Human-readable error description
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error envelope.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Error type for JSON API handlers, mapped onto the response envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request shape was invalid.
    #[error("{0}")]
    Validation(String),
    /// A referenced task or board does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The store failed; details are logged, not returned.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::MissingTitle
            | TaskServiceError::MissingBoardId
            | TaskServiceError::InvalidStatus(_) => ApiError::Validation(err.to_string()),
            TaskServiceError::BoardNotFound(_) | TaskServiceError::TaskNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            TaskServiceError::Store(store_err) => ApiError::Store(store_err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Store(err) => {
                tracing::error!("store failure while handling request: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status_code, Json(ErrorResponse::new(message))).into_response()
    }
}

/// OpenAPI description of the JSON API.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::task::api::list_tasks_handler,
        crate::task::api::get_task_handler,
        crate::task::api::create_task_handler,
        crate::task::api::update_task_handler,
        crate::task::api::delete_task_handler,
        crate::board::api::list_boards_handler,
        crate::dashboard::get_dashboard_handler,
        crate::web::health_check_handler,
    ),
    tags(
        (name = "Tasks", description = "Task CRUD operations"),
        (name = "Boards", description = "Board listing"),
        (name = "Dashboard", description = "Aggregated task statistics"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Handler for GET /openapi.json - serves the API description.
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the router for the complete JSON API.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    let tasks_router = task::api::create_api_router(state.clone());
    let boards_router = board::api::create_api_router(state.clone());
    let dashboard_router = dashboard::create_api_router(state);

    Router::new()
        .merge(tasks_router)
        .merge(boards_router)
        .merge(dashboard_router)
        .route("/health", get(health_check_handler))
        .route("/openapi.json", get(openapi_handler))
        .fallback(not_found_handler)
}
