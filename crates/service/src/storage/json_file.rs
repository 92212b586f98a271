use std::{path::{Path, PathBuf}, sync::Arc};

use async_trait::async_trait;
use models::{Collection, Document};
use serde_json::{Map, Value};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use super::{collections::Collections, new_id, DocumentStore};
use crate::{errors::ServiceError, patch::UpdateInstruction};

/// Document store persisted to a single JSON file.
///
/// The whole state lives in memory and is rewritten to disk after every
/// mutation, while the write lock is still held. A mutation whose write fails
/// is not applied. Intended for small single-process setups.
pub struct JsonFileDocumentStore {
    inner: RwLock<Collections>,
    file_path: PathBuf,
}

impl JsonFileDocumentStore {
    /// Open the store at `path`. Creates the file with empty collections if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(ServiceError::internal)?;
            }
        }

        let state = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice::<Collections>(&bytes).map_err(|e| {
                ServiceError::Internal(format!("corrupt document file {}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = Collections::default();
                write_state(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::internal(e)),
        };
        debug!(path = %file_path.display(), "opened json document store");

        Ok(Arc::new(Self { inner: RwLock::new(state), file_path }))
    }

    /// Apply a mutation to a copy of the state and persist it, swapping the copy
    /// in only once the file is written. `None` means nothing changed and skips
    /// the write.
    async fn mutate<T, F>(&self, f: F) -> Result<Option<T>, ServiceError>
    where
        F: FnOnce(&mut Collections) -> Option<T> + Send,
        T: Send,
    {
        let mut state = self.inner.write().await;
        let mut next = state.clone();
        let Some(out) = f(&mut next) else { return Ok(None) };
        write_state(&self.file_path, &next).await?;
        *state = next;
        Ok(Some(out))
    }
}

/// Write to a sibling temp file, then rename it over `path`.
async fn write_state(path: &Path, state: &Collections) -> Result<(), ServiceError> {
    let data = serde_json::to_vec(state).map_err(ServiceError::internal)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data).await.map_err(ServiceError::internal)?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(ServiceError::internal(e));
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, ServiceError> {
        Ok(self.inner.read().await.find_by_id(collection, id))
    }

    async fn find(&self, collection: Collection, parent_id: Option<&str>) -> Result<Vec<Document>, ServiceError> {
        Ok(self.inner.read().await.find(collection, parent_id))
    }

    async fn insert(&self, collection: Collection, fields: Map<String, Value>) -> Result<Document, ServiceError> {
        let id = new_id();
        self.mutate(|state| Some(state.insert(collection, id, fields)))
            .await?
            .ok_or_else(|| ServiceError::internal("insert produced no document"))
    }

    async fn update_by_id(&self, collection: Collection, id: &str, update: &UpdateInstruction) -> Result<Option<Document>, ServiceError> {
        self.mutate(|state| state.update(collection, id, update)).await
    }

    async fn delete_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, ServiceError> {
        self.mutate(|state| state.remove(collection, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_document_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn json_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonFileDocumentStore::open(&tmp).await?;

        // initially empty
        assert!(store.find(Collection::Groups, None).await?.is_empty());

        let Value::Object(a) = json!({"name": "a"}) else { unreachable!() };
        let Value::Object(b) = json!({"name": "b"}) else { unreachable!() };
        let a = store.insert(Collection::Groups, a).await?;
        let b = store.insert(Collection::Groups, b).await?;

        let Value::Object(set) = json!({"name": "a2"}) else { unreachable!() };
        let update = UpdateInstruction { set, unset: vec![] };
        store.update_by_id(Collection::Groups, &a.id, &update).await?;
        assert!(store.delete_by_id(Collection::Groups, &b.id).await?.is_some());

        // reload from disk
        let reloaded = JsonFileDocumentStore::open(&tmp).await?;
        let docs = reloaded.find(Collection::Groups, None).await?;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, a.id);
        assert_eq!(docs[0].get("name"), Some(&json!("a2")));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        tokio::fs::write(&tmp, b"{not json").await?;
        let opened = JsonFileDocumentStore::open(&tmp).await;
        assert!(matches!(opened, Err(ServiceError::Internal(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_leaves_state_untouched() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonFileDocumentStore::open(&tmp).await?;
        let Value::Object(a) = json!({"name": "a"}) else { unreachable!() };
        let a = store.insert(Collection::Groups, a).await?;

        // a directory at the file path makes every rename fail
        tokio::fs::remove_file(&tmp).await?;
        tokio::fs::create_dir(&tmp).await?;

        let Value::Object(b) = json!({"name": "b"}) else { unreachable!() };
        let inserted = store.insert(Collection::Groups, b).await;
        assert!(matches!(inserted, Err(ServiceError::Internal(_))));

        let Value::Object(set) = json!({"name": "a2"}) else { unreachable!() };
        let update = UpdateInstruction { set, unset: vec![] };
        assert!(store.update_by_id(Collection::Groups, &a.id, &update).await.is_err());
        assert!(store.delete_by_id(Collection::Groups, &a.id).await.is_err());

        let docs = store.find(Collection::Groups, None).await?;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("name"), Some(&json!("a")));

        // misses change nothing, so nothing is written
        assert!(store.update_by_id(Collection::Groups, "missing", &update).await?.is_none());
        assert!(store.delete_by_id(Collection::Groups, "missing").await?.is_none());

        let mut leftover = tmp.as_os_str().to_owned();
        leftover.push(".tmp");
        assert!(!PathBuf::from(leftover).exists());

        let _ = tokio::fs::remove_dir(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_create_is_not_listed() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonFileDocumentStore::open(&tmp).await?;
        tokio::fs::remove_file(&tmp).await?;
        tokio::fs::create_dir(&tmp).await?;

        let groups = crate::GroupService::new(store.clone());
        let created = groups.create(None, &json!({"name": "G"})).await;
        assert!(matches!(created, Err(ServiceError::Internal(_))));
        assert!(groups.find_all(None).await?.is_empty());

        let _ = tokio::fs::remove_dir(&tmp).await;
        Ok(())
    }
}
