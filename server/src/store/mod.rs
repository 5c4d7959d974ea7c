//! Document store port shared by the task and board tables.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub mod memory;

pub use memory::InMemoryStore;

/// A schemaless item as stored in a table.
pub type Document = serde_json::Map<String, Value>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Attribute-equality predicate applied during a table scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFilter {
    attribute: String,
    value: Value,
}

impl ScanFilter {
    /// Creates a filter matching items whose `attribute` equals `value`.
    pub fn equals(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Returns true when the document satisfies the predicate.
    pub fn matches(&self, document: &Document) -> bool {
        document.get(&self.attribute) == Some(&self.value)
    }
}

/// Errors returned by document store implementations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The named table has not been provisioned.
    #[error("table '{0}' not found")]
    TableNotFound(String),
    /// The item carries no string `id` attribute to key it by.
    #[error("item is missing its 'id' attribute")]
    MissingId,
    /// Failure in the storage backend.
    #[error("store backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}

/// Persistence contract: point lookups by id, unconditional writes, and
/// full-table scans with an optional attribute-equality filter.
///
/// Items are keyed by their `id` attribute. A put replaces any existing item
/// with the same id; conditional writes are not part of this contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the item with the given id, or `None` when absent.
    async fn get_item(&self, table: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Writes the full item, replacing any existing item with the same id.
    async fn put_item(&self, table: &str, item: Document) -> StoreResult<()>;

    /// Deletes the item with the given id. Deleting an absent id is not an
    /// error.
    async fn delete_item(&self, table: &str, id: &str) -> StoreResult<()>;

    /// Returns every item in the table, restricted to matches when a filter
    /// is given.
    async fn scan<'a>(
        &self,
        table: &str,
        filter: Option<&'a ScanFilter>,
    ) -> StoreResult<Vec<Document>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn filter_matches_on_attribute_equality() {
        let filter = ScanFilter::equals("boardId", "b1");

        assert!(filter.matches(&document(json!({"id": "t1", "boardId": "b1"}))));
        assert!(!filter.matches(&document(json!({"id": "t2", "boardId": "b2"}))));
    }

    #[test]
    fn filter_does_not_match_absent_attribute() {
        let filter = ScanFilter::equals("boardId", "b1");

        assert!(!filter.matches(&document(json!({"id": "t1"}))));
    }
}
