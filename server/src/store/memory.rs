//! In-memory document store adapter.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use super::{Document, DocumentStore, ScanFilter, StoreError, StoreResult};

type Tables = HashMap<String, BTreeMap<String, Document>>;

/// Thread-safe in-memory document store.
///
/// Tables must be registered at construction; operations against an
/// unregistered table fail with [`StoreError::TableNotFound`], mirroring a
/// managed store whose tables are provisioned out of band. Items are held in
/// id order, so scan output is deterministic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a store with the given tables registered and empty.
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tables = tables
            .into_iter()
            .map(|name| (name.into(), BTreeMap::new()))
            .collect();
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|err| StoreError::backend(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|err| StoreError::backend(std::io::Error::other(err.to_string())))
    }
}

fn item_id(item: &Document) -> StoreResult<String> {
    item.get("id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(StoreError::MissingId)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_item(&self, table: &str, id: &str) -> StoreResult<Option<Document>> {
        let tables = self.read()?;
        let items = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_owned()))?;
        Ok(items.get(id).cloned())
    }

    async fn put_item(&self, table: &str, item: Document) -> StoreResult<()> {
        let id = item_id(&item)?;
        let mut tables = self.write()?;
        let items = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_owned()))?;
        items.insert(id, item);
        Ok(())
    }

    async fn delete_item(&self, table: &str, id: &str) -> StoreResult<()> {
        let mut tables = self.write()?;
        let items = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_owned()))?;
        items.remove(id);
        Ok(())
    }

    async fn scan<'a>(
        &self,
        table: &str,
        filter: Option<&'a ScanFilter>,
    ) -> StoreResult<Vec<Document>> {
        let tables = self.read()?;
        let items = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_owned()))?;
        Ok(items
            .values()
            .filter(|item| filter.is_none_or(|filter| filter.matches(item)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new(["tasks", "boards"])
    }

    #[tokio::test]
    async fn can_put_and_get_item() {
        let store = store();
        let item = document(json!({"id": "t1", "title": "Write docs"}));

        store.put_item("tasks", item.clone()).await.unwrap();

        let found = store.get_item("tasks", "t1").await.unwrap();
        assert_eq!(found, Some(item));
    }

    #[tokio::test]
    async fn get_returns_none_for_missing_item() {
        let store = store();

        let found = store.get_item("tasks", "nope").await.unwrap();

        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn put_replaces_existing_item() {
        let store = store();
        store
            .put_item("tasks", document(json!({"id": "t1", "title": "old"})))
            .await
            .unwrap();

        let replacement = document(json!({"id": "t1", "title": "new"}));
        store.put_item("tasks", replacement.clone()).await.unwrap();

        let found = store.get_item("tasks", "t1").await.unwrap();
        assert_eq!(found, Some(replacement));
    }

    #[tokio::test]
    async fn put_without_id_is_rejected() {
        let store = store();

        let result = store
            .put_item("tasks", document(json!({"title": "no id"})))
            .await;

        assert!(matches!(result, Err(StoreError::MissingId)));
    }

    #[tokio::test]
    async fn can_delete_item_and_deleting_absent_id_is_not_an_error() {
        let store = store();
        store
            .put_item("tasks", document(json!({"id": "t1"})))
            .await
            .unwrap();

        store.delete_item("tasks", "t1").await.unwrap();
        store.delete_item("tasks", "t1").await.unwrap();

        assert_eq!(store.get_item("tasks", "t1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn scan_returns_all_items_in_id_order() {
        let store = store();
        store
            .put_item("tasks", document(json!({"id": "b"})))
            .await
            .unwrap();
        store
            .put_item("tasks", document(json!({"id": "a"})))
            .await
            .unwrap();

        let items = store.scan("tasks", None).await.unwrap();

        let ids: Vec<_> = items
            .iter()
            .map(|item| item.get("id").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn scan_applies_equality_filter() {
        let store = store();
        store
            .put_item("tasks", document(json!({"id": "t1", "boardId": "b1"})))
            .await
            .unwrap();
        store
            .put_item("tasks", document(json!({"id": "t2", "boardId": "b2"})))
            .await
            .unwrap();

        let filter = ScanFilter::equals("boardId", "b1");
        let items = store.scan("tasks", Some(&filter)).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("id"), Some(&json!("t1")));
    }

    #[tokio::test]
    async fn unknown_table_is_an_error() {
        let store = store();

        let result = store.get_item("ghosts", "t1").await;

        assert!(matches!(result, Err(StoreError::TableNotFound(table)) if table == "ghosts"));
    }
}
