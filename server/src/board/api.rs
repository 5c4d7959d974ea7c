use crate::board::{Board, BoardService};
use crate::store::Document;
use crate::web::AppState;
use crate::web::api::{ApiError, ErrorResponse};
use axum::{Router, extract::State, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON representation of a board: the id plus pass-through attributes.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardJson {
    /// Unique identifier for the board
    id: String,
    /// Attributes stored with the board, passed through uninterpreted
    #[serde(flatten)]
    #[schema(value_type = Object)]
    attributes: Document,
}

impl From<Board> for BoardJson {
    fn from(board: Board) -> Self {
        Self {
            id: board.id().to_string(),
            attributes: board.attributes().clone(),
        }
    }
}

/// API response for listing boards.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardsResponse {
    /// Always true for successful responses
    success: bool,
    /// List of boards
    boards: Vec<BoardJson>,
    /// Total number of boards
    total: usize,
}

/// Handler for GET /boards - returns all boards.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/boards",
    responses(
        (status = 200, description = "Successfully retrieved boards", body = BoardsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Boards"
)]
pub async fn list_boards_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BoardsResponse>, ApiError> {
    let service = BoardService::new(state.store.as_ref(), &state.config.boards_table);
    let boards = service.list_boards().await?;

    let boards: Vec<BoardJson> = boards.into_iter().map(BoardJson::from).collect();
    let total = boards.len();
    Ok(Json(BoardsResponse {
        success: true,
        boards,
        total,
    }))
}

/// Creates and returns the boards API router.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/boards", get(list_boards_handler))
        .with_state(state)
}
