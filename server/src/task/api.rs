use crate::task::{NewTask, Task, TaskPatch, TaskService, TaskStatus};
use crate::web::AppState;
use crate::web::api::{ApiError, ErrorResponse};
use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON representation of a task for API responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    /// Unique identifier for the task
    id: String,
    /// Board the task belongs to
    board_id: String,
    /// Short human-readable title
    title: String,
    /// Free-form description, possibly empty
    description: String,
    /// Workflow status: todo, in-progress or done
    status: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last-modification timestamp
    updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskJson {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            board_id: task.board_id().to_string(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            status: task.status().to_string(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Tasks grouped by recognized status, in scan order.
///
/// Tasks whose stored status is outside the recognized set appear in no
/// group; the flat task list still carries them.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct TasksByStatus {
    /// Tasks not yet started
    todo: Vec<TaskJson>,
    /// Tasks currently being worked on
    #[serde(rename = "in-progress")]
    in_progress: Vec<TaskJson>,
    /// Completed tasks
    done: Vec<TaskJson>,
}

impl TasksByStatus {
    fn group(tasks: &[Task]) -> Self {
        let mut groups = TasksByStatus::default();
        for task in tasks {
            match task.parsed_status() {
                Some(TaskStatus::Todo) => groups.todo.push(TaskJson::from(task)),
                Some(TaskStatus::InProgress) => groups.in_progress.push(TaskJson::from(task)),
                Some(TaskStatus::Done) => groups.done.push(TaskJson::from(task)),
                None => {}
            }
        }
        groups
    }
}

/// API response for listing tasks.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TasksResponse {
    /// Always true for successful responses
    success: bool,
    /// Flat list of tasks in scan order
    tasks: Vec<TaskJson>,
    /// The same tasks grouped by recognized status
    tasks_by_status: TasksByStatus,
    /// Number of tasks in `tasks`
    total: usize,
    /// Echo of the board filter; omitted when no filter was given
    #[serde(skip_serializing_if = "Option::is_none")]
    board_id: Option<String>,
}

/// API response carrying a single task.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    /// Always true for successful responses
    success: bool,
    /// The task
    task: TaskJson,
}

/// API response for a successful deletion.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskDeletedResponse {
    /// Always true for successful responses
    success: bool,
    /// Confirmation message
    message: String,
}

/// Query parameters for filtering tasks by board.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TasksQuery {
    /// Optional board id to filter tasks by
    #[serde(default)]
    board_id: Option<String>,
}

fn task_service(state: &AppState) -> TaskService<'_> {
    TaskService::new(
        state.store.as_ref(),
        &state.config.tasks_table,
        &state.config.boards_table,
    )
}

/// Handler for GET /tasks - lists tasks with a by-status grouping.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks",
    params(
        ("boardId" = Option<String>, Query, description = "Optional board id to filter tasks by")
    ),
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = TasksResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TasksQuery>,
) -> Result<Json<TasksResponse>, ApiError> {
    let service = task_service(&state);
    let tasks = service.list_tasks(query.board_id.as_deref()).await?;

    Ok(Json(TasksResponse {
        success: true,
        tasks_by_status: TasksByStatus::group(&tasks),
        total: tasks.len(),
        tasks: tasks.iter().map(TaskJson::from).collect(),
        board_id: query.board_id,
    }))
}

/// Handler for GET /tasks/{id} - returns a single task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the task", body = TaskResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = task_service(&state).get_task(&id).await?;

    Ok(Json(TaskResponse {
        success: true,
        task: TaskJson::from(&task),
    }))
}

/// Handler for POST /tasks - creates a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Missing title or boardId, or invalid status", body = ErrorResponse),
        (status = 404, description = "Referenced board not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<AppState>>,
    Json(new_task): Json<NewTask>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let task = task_service(&state).create_task(new_task).await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            success: true,
            task: TaskJson::from(&task),
        }),
    ))
}

/// Handler for PUT /tasks/{id} - applies a partial update.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    request_body = TaskPatch,
    params(
        ("id" = String, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = task_service(&state).update_task(&id, patch).await?;

    Ok(Json(TaskResponse {
        success: true,
        task: TaskJson::from(&task),
    }))
}

/// Handler for DELETE /tasks/{id} - deletes a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Task deleted", body = TaskDeletedResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskDeletedResponse>, ApiError> {
    task_service(&state).delete_task(&id).await?;

    Ok(Json(TaskDeletedResponse {
        success: true,
        message: "Task deleted successfully".to_string(),
    }))
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
