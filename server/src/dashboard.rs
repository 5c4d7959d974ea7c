//! Aggregated task statistics for the dashboard view.

use crate::task::api::TaskJson;
use crate::task::{Task, TaskService, TaskStatus};
use crate::web::AppState;
use crate::web::api::{ApiError, ErrorResponse};
use axum::{Router, extract::State, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Number of recently-updated tasks returned with the dashboard.
const RECENT_TASK_LIMIT: usize = 5;

/// Per-status task counts and completion percentage.
///
/// `total` counts every task, including ones with an unrecognized status;
/// the three per-status counts cover recognized statuses only.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Total number of tasks, whatever their status
    total: usize,
    /// Tasks with status todo
    todo: usize,
    /// Tasks with status in-progress
    in_progress: usize,
    /// Tasks with status done
    done: usize,
    /// Percentage of done tasks, rounded to the nearest integer
    completion_rate: u32,
}

/// API response for the dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Always true for successful responses
    success: bool,
    /// Aggregated task counts
    stats: DashboardStats,
    /// The most recently updated tasks, newest first
    recent_tasks: Vec<TaskJson>,
}

/// Computes dashboard statistics over the full task list.
fn compute_stats(tasks: &[Task]) -> DashboardStats {
    let mut todo = 0;
    let mut in_progress = 0;
    let mut done = 0;
    for task in tasks {
        match task.parsed_status() {
            Some(TaskStatus::Todo) => todo += 1,
            Some(TaskStatus::InProgress) => in_progress += 1,
            Some(TaskStatus::Done) => done += 1,
            None => {}
        }
    }

    let total = tasks.len();
    let completion_rate = if total == 0 {
        0
    } else {
        (done as f64 * 100.0 / total as f64).round() as u32
    };

    DashboardStats {
        total,
        todo,
        in_progress,
        done,
        completion_rate,
    }
}

/// Returns the `limit` most recently updated tasks, newest first.
fn recent_tasks(mut tasks: Vec<Task>, limit: usize) -> Vec<Task> {
    tasks.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
    tasks.truncate(limit);
    tasks
}

/// Handler for GET /dashboard - global task statistics and recent activity.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Successfully computed dashboard", body = DashboardResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let service = TaskService::new(
        state.store.as_ref(),
        &state.config.tasks_table,
        &state.config.boards_table,
    );
    let tasks = service.list_tasks(None).await?;

    let stats = compute_stats(&tasks);
    let recent = recent_tasks(tasks, RECENT_TASK_LIMIT);
    Ok(Json(DashboardResponse {
        success: true,
        stats,
        recent_tasks: recent.iter().map(TaskJson::from).collect(),
    }))
}

/// Creates and returns the dashboard API router.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/dashboard", get(get_dashboard_handler))
        .with_state(state)
}
