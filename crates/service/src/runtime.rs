//! Bootstrap: turn an [`AppConfig`] into ready-to-use services.

use std::sync::Arc;

use configs::{AppConfig, StoreBackend};
use tracing::info;

use crate::{
    resource::{GroupService, MilestoneService, TaskService},
    storage::{DocumentStore, JsonFileDocumentStore, MemoryDocumentStore},
};

/// The three resource services over one shared store.
#[derive(Clone)]
pub struct Services {
    pub groups: GroupService,
    pub tasks: TaskService,
    pub milestones: MilestoneService,
}

impl Services {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            groups: GroupService::new(Arc::clone(&store)),
            tasks: TaskService::new(Arc::clone(&store)),
            milestones: MilestoneService::new(store),
        }
    }
}

/// Open the store selected by `[store].backend`.
pub async fn open_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match cfg.store.backend {
        StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
        StoreBackend::File => {
            common::env::ensure_parent_dir(&cfg.store.path).await?;
            JsonFileDocumentStore::open(&cfg.store.path).await? as Arc<dyn DocumentStore>
        }
        StoreBackend::Postgres => open_postgres(cfg).await?,
    };
    info!(backend = ?cfg.store.backend, "document store ready");
    Ok(store)
}

#[cfg(feature = "seaorm")]
async fn open_postgres(cfg: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    let store = crate::storage::SeaOrmDocumentStore::new(db);
    store.migrate().await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "seaorm"))]
async fn open_postgres(_cfg: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    anyhow::bail!("store.backend = \"postgres\" requires the `seaorm` feature")
}

/// Initialize logging from config, open the store and build the services.
pub async fn bootstrap(cfg: &AppConfig) -> anyhow::Result<Services> {
    common::utils::logging::init_logging(&cfg.logging)?;
    let store = open_store(cfg).await?;
    Ok(Services::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_bootstrap_shares_one_store() -> Result<(), anyhow::Error> {
        let services = bootstrap(&AppConfig::default()).await?;
        let group = services.groups.create(None, &json!({"name": "Inbox"})).await?;
        let task = services.tasks.create(Some(&group.id), &json!({"name": "Call back"})).await?;
        let listed = services.tasks.find_all(Some(&group.id)).await?;
        assert_eq!(listed, vec![task]);
        Ok(())
    }

    #[tokio::test]
    async fn file_bootstrap_persists_across_opens() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("taskboard_runtime_{}", uuid::Uuid::new_v4()));
        let mut cfg = AppConfig::default();
        cfg.store.backend = StoreBackend::File;
        cfg.store.path = dir.join("documents.json").to_string_lossy().into_owned();

        let created = Services::new(open_store(&cfg).await?).groups.create(None, &json!({"name": "Home"})).await?;
        let reopened = Services::new(open_store(&cfg).await?);
        assert_eq!(reopened.groups.find_by_id(&created.id).await?, created);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[cfg(not(feature = "seaorm"))]
    #[tokio::test]
    async fn postgres_without_feature_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.store.backend = StoreBackend::Postgres;
        assert!(open_store(&cfg).await.is_err());
    }
}
