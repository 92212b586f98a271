use async_trait::async_trait;
use migration::MigratorTrait;
use models::{document, Collection, Document};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, TransactionTrait,
};
use serde_json::{Map, Value};
use tracing::info;

use super::{new_id, DocumentStore};
use crate::{errors::ServiceError, patch::UpdateInstruction};

/// SeaORM-backed store over the `document` table.
pub struct SeaOrmDocumentStore {
    pub db: DatabaseConnection,
}

impl SeaOrmDocumentStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    /// Bring the schema up to date.
    pub async fn migrate(&self) -> Result<(), ServiceError> {
        migration::Migrator::up(&self.db, None).await.map_err(ServiceError::internal)?;
        info!("document schema migrated");
        Ok(())
    }

    fn by_id(collection: Collection, id: &str) -> sea_orm::Select<document::Entity> {
        document::Entity::find_by_id(id.to_string()).filter(document::Column::Collection.eq(collection.name()))
    }
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, ServiceError> {
        let row = Self::by_id(collection, id).one(&self.db).await.map_err(ServiceError::internal)?;
        Ok(row.map(Document::try_from).transpose()?)
    }

    async fn find(&self, collection: Collection, parent_id: Option<&str>) -> Result<Vec<Document>, ServiceError> {
        let mut query = document::Entity::find().filter(document::Column::Collection.eq(collection.name()));
        if let (Some(_), Some(parent)) = (collection.parent_field(), parent_id) {
            query = query.filter(document::Column::ParentId.eq(parent));
        }
        let rows = query.all(&self.db).await.map_err(ServiceError::internal)?;
        rows.into_iter().map(|row| Document::try_from(row).map_err(ServiceError::from)).collect()
    }

    async fn insert(&self, collection: Collection, fields: Map<String, Value>) -> Result<Document, ServiceError> {
        let doc = Document::new(new_id(), fields);
        document::to_active_model(collection, &doc).insert(&self.db).await.map_err(ServiceError::internal)?;
        Ok(doc)
    }

    async fn update_by_id(&self, collection: Collection, id: &str, update: &UpdateInstruction) -> Result<Option<Document>, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::internal)?;
        let Some(row) = Self::by_id(collection, id).lock_exclusive().one(&txn).await.map_err(ServiceError::internal)? else {
            txn.rollback().await.map_err(ServiceError::internal)?;
            return Ok(None);
        };
        let mut doc = Document::try_from(row)?;
        update.apply(&mut doc.fields);
        document::to_active_model(collection, &doc).update(&txn).await.map_err(ServiceError::internal)?;
        txn.commit().await.map_err(ServiceError::internal)?;
        Ok(Some(doc))
    }

    async fn delete_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::internal)?;
        let Some(row) = Self::by_id(collection, id).lock_exclusive().one(&txn).await.map_err(ServiceError::internal)? else {
            txn.rollback().await.map_err(ServiceError::internal)?;
            return Ok(None);
        };
        document::Entity::delete_by_id(row.id.clone()).exec(&txn).await.map_err(ServiceError::internal)?;
        txn.commit().await.map_err(ServiceError::internal)?;
        Ok(Some(Document::try_from(row)?))
    }
}
