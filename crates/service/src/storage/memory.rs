use async_trait::async_trait;
use models::{Collection, Document};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{collections::Collections, new_id, DocumentStore};
use crate::{errors::ServiceError, patch::UpdateInstruction};

/// Process-local document store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Collections>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn count(&self, collection: Collection) -> usize {
        self.inner.read().await.len(collection)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, ServiceError> {
        Ok(self.inner.read().await.find_by_id(collection, id))
    }

    async fn find(&self, collection: Collection, parent_id: Option<&str>) -> Result<Vec<Document>, ServiceError> {
        Ok(self.inner.read().await.find(collection, parent_id))
    }

    async fn insert(&self, collection: Collection, fields: Map<String, Value>) -> Result<Document, ServiceError> {
        Ok(self.inner.write().await.insert(collection, new_id(), fields))
    }

    async fn update_by_id(&self, collection: Collection, id: &str, update: &UpdateInstruction) -> Result<Option<Document>, ServiceError> {
        Ok(self.inner.write().await.update(collection, id, update))
    }

    async fn delete_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, ServiceError> {
        Ok(self.inner.write().await.remove(collection, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_unique_ids() -> Result<(), anyhow::Error> {
        let store = MemoryDocumentStore::new();
        let a = store.insert(Collection::Groups, Map::new()).await?;
        let b = store.insert(Collection::Groups, Map::new()).await?;
        assert_ne!(a.id, b.id);
        assert_eq!(store.count(Collection::Groups).await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_return_none() -> Result<(), anyhow::Error> {
        let store = MemoryDocumentStore::new();
        let Value::Object(fields) = json!({"name": "n"}) else { unreachable!() };
        let doc = store.insert(Collection::Groups, fields).await?;

        let update = crate::patch::build_update(&Map::new());
        assert!(store.update_by_id(Collection::Groups, "missing", &update).await?.is_none());
        assert!(store.delete_by_id(Collection::Groups, "missing").await?.is_none());

        let removed = store.delete_by_id(Collection::Groups, &doc.id).await?;
        assert_eq!(removed, Some(doc.clone()));
        assert!(store.find_by_id(Collection::Groups, &doc.id).await?.is_none());
        Ok(())
    }
}
