use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Document, DocumentStore, StoreError};

pub mod api;

/// A board record. Only `id` is interpreted; every other attribute is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    id: String,
    #[serde(flatten)]
    attributes: Document,
}

impl Board {
    /// Returns the board id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the opaque pass-through attributes.
    pub fn attributes(&self) -> &Document {
        &self.attributes
    }
}

/// Board lookups over the document store.
///
/// Boards are read-only from this service's perspective; they are
/// provisioned out of band.
pub struct BoardService<'a> {
    store: &'a dyn DocumentStore,
    boards_table: &'a str,
}

impl<'a> BoardService<'a> {
    pub fn new(store: &'a dyn DocumentStore, boards_table: &'a str) -> Self {
        Self {
            store,
            boards_table,
        }
    }

    /// Retrieves all boards.
    #[tracing::instrument(skip(self))]
    pub async fn list_boards(&self) -> Result<Vec<Board>, StoreError> {
        let documents = self.store.scan(self.boards_table, None).await?;
        Ok(documents
            .into_iter()
            .filter_map(|document| match serde_json::from_value(Value::Object(document)) {
                Ok(board) => Some(board),
                Err(err) => {
                    tracing::warn!("skipping undecodable board document: {err}");
                    None
                }
            })
            .collect())
    }
}
