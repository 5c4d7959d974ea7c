use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::{Document, DocumentStore, ScanFilter, StoreError};

pub mod api;

/// Workflow status of a task.
///
/// Any status is reachable from any other; there is no transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Returns the wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for status values outside the recognized set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{0}': must be one of todo, in-progress, done")]
pub struct InvalidStatusError(String);

impl TryFrom<&str> for TaskStatus {
    type Error = InvalidStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(InvalidStatusError(value.to_owned())),
        }
    }
}

/// A task record as stored in the task table.
///
/// The status is kept as a raw string: the table is schemaless and may hold
/// documents written by other producers whose status is outside
/// [`TaskStatus`]. Such tasks stay listable but are excluded from status
/// groupings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: String,
    board_id: String,
    title: String,
    #[serde(default)]
    description: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Returns the task id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the id of the board this task belongs to.
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, possibly empty.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the raw status value.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the parsed status, or `None` for unrecognized values.
    pub fn parsed_status(&self) -> Option<TaskStatus> {
        TaskStatus::try_from(self.status.as_str()).ok()
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Payload for creating a task.
///
/// Field presence is validated by the service rather than the deserializer,
/// so a missing field yields the contract's 400 message instead of an
/// extractor rejection.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Required, non-empty
    pub title: Option<String>,
    /// Required; must reference an existing board
    pub board_id: Option<String>,
    /// Defaults to the empty string
    pub description: Option<String>,
    /// Defaults to `todo`; must be a recognized status when present
    pub status: Option<String>,
}

/// Partial update for a task.
///
/// An absent field leaves the stored value unchanged; a present field
/// replaces it, including `description: ""` which clears the description.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,
    /// New description; the empty string clears it
    pub description: Option<String>,
    /// New status; must be a recognized status when present
    pub status: Option<String>,
}

/// Error type for `TaskService` operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Create payload had no usable title.
    #[error("Title is required")]
    MissingTitle,
    /// Create payload had no usable board id.
    #[error("boardId is required")]
    MissingBoardId,
    /// A status value outside the recognized set was supplied.
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatusError),
    /// The referenced board does not exist.
    #[error("Board '{0}' not found")]
    BoardNotFound(String),
    /// The referenced task does not exist.
    #[error("Task '{0}' not found")]
    TaskNotFound(String),
    /// The store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Task operations over the document store.
pub struct TaskService<'a> {
    store: &'a dyn DocumentStore,
    tasks_table: &'a str,
    boards_table: &'a str,
}

impl<'a> TaskService<'a> {
    pub fn new(store: &'a dyn DocumentStore, tasks_table: &'a str, boards_table: &'a str) -> Self {
        Self {
            store,
            tasks_table,
            boards_table,
        }
    }

    /// Retrieves all tasks, or all tasks on the given board.
    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(&self, board_id: Option<&str>) -> Result<Vec<Task>, TaskServiceError> {
        let filter = board_id.map(|id| ScanFilter::equals("boardId", id));
        let documents = self.store.scan(self.tasks_table, filter.as_ref()).await?;
        Ok(decode_tasks(documents))
    }

    /// Retrieves a task by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_task(&self, id: &str) -> Result<Task, TaskServiceError> {
        let document = self
            .store
            .get_item(self.tasks_table, id)
            .await?
            .ok_or_else(|| TaskServiceError::TaskNotFound(id.to_owned()))?;
        decode_task(document)
    }

    /// Creates a task after validating the payload and the referenced board.
    ///
    /// The generated id is written with an unconditional put, so an
    /// improbable id collision replaces the older task.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, TaskServiceError> {
        let title = new_task
            .title
            .filter(|title| !title.is_empty())
            .ok_or(TaskServiceError::MissingTitle)?;
        let board_id = new_task
            .board_id
            .filter(|board_id| !board_id.is_empty())
            .ok_or(TaskServiceError::MissingBoardId)?;

        if self
            .store
            .get_item(self.boards_table, &board_id)
            .await?
            .is_none()
        {
            return Err(TaskServiceError::BoardNotFound(board_id));
        }

        let status = match new_task.status.as_deref() {
            Some(value) => TaskStatus::try_from(value)?,
            None => TaskStatus::Todo,
        };

        let now = Utc::now();
        let task = Task {
            id: generate_task_id(now),
            board_id,
            title,
            description: new_task.description.unwrap_or_default(),
            status: status.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.store
            .put_item(self.tasks_table, encode_task(&task)?)
            .await?;
        Ok(task)
    }

    /// Applies a partial update to an existing task.
    ///
    /// `updated_at` is refreshed even when the patch is empty.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task, TaskServiceError> {
        let mut task = self.get_task(id).await?;

        let status = patch
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = status {
            task.status = status.as_str().to_owned();
        }
        task.updated_at = Utc::now();

        self.store
            .put_item(self.tasks_table, encode_task(&task)?)
            .await?;
        Ok(task)
    }

    /// Deletes a task by id.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: &str) -> Result<(), TaskServiceError> {
        if self
            .store
            .get_item(self.tasks_table, id)
            .await?
            .is_none()
        {
            return Err(TaskServiceError::TaskNotFound(id.to_owned()));
        }
        self.store.delete_item(self.tasks_table, id).await?;
        Ok(())
    }
}

/// Generates a task id from the creation timestamp plus a random suffix.
///
/// Ids sort roughly by creation time. Uniqueness is probabilistic; the
/// create path overwrites on collision.
fn generate_task_id(now: DateTime<Utc>) -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(8);
    format!("{}-{}", now.timestamp_millis(), suffix)
}

fn decode_task(document: Document) -> Result<Task, TaskServiceError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|err| TaskServiceError::Store(StoreError::backend(err)))
}

/// Decodes scan output, skipping documents that do not look like tasks. The
/// table is schemaless, so one foreign document must not fail a whole list.
fn decode_tasks(documents: Vec<Document>) -> Vec<Task> {
    documents
        .into_iter()
        .filter_map(|document| match serde_json::from_value(Value::Object(document)) {
            Ok(task) => Some(task),
            Err(err) => {
                tracing::warn!("skipping undecodable task document: {err}");
                None
            }
        })
        .collect()
}

fn encode_task(task: &Task) -> Result<Document, TaskServiceError> {
    let value = serde_json::to_value(task)
        .map_err(|err| TaskServiceError::Store(StoreError::backend(err)))?;
    match value {
        Value::Object(document) => Ok(document),
        _ => Err(TaskServiceError::Store(StoreError::backend(
            std::io::Error::other("task did not serialize to an object"),
        ))),
    }
}
