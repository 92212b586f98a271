//! Generic CRUD service over one collection.
//!
//! [`ResourceService`] holds the validation, patch and not-found logic once;
//! each entity plugs in its schemas, collection and DTO through [`Resource`].
//! Services never look at another collection: a child may be created under a
//! parent id that does not exist, and deleting a parent leaves its children.

use std::{marker::PhantomData, sync::Arc};

use models::{errors::ModelError, Collection, Document};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::{
    errors::ServiceError,
    patch::build_update,
    storage::DocumentStore,
    validation::{assert_valid, Schema},
};

pub mod group;
pub mod milestone;
pub mod task;

pub use group::{Group, GroupService};
pub use milestone::{Milestone, MilestoneService};
pub use task::{Task, TaskService};

/// Per-entity configuration of a [`ResourceService`].
pub trait Resource: Send + Sync + 'static {
    type Dto: for<'a> TryFrom<&'a Document, Error = ModelError> + Serialize + Send;

    const COLLECTION: Collection;
    /// Singular name used in logs and not-found messages.
    const ENTITY: &'static str;

    fn create_schema() -> &'static Schema;
    fn update_schema() -> &'static Schema;

    /// Fields the service fills in on create when the input left them out.
    fn apply_defaults(_fields: &mut Map<String, Value>) {}
}

/// CRUD over one collection.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use service::{storage::MemoryDocumentStore, TaskService};
/// let tasks = TaskService::new(Arc::new(MemoryDocumentStore::new()));
/// let input = serde_json::json!({"name": "Pay rent", "priority": 2});
/// let task = tokio_test::block_on(tasks.create(Some("g1"), &input)).unwrap();
/// assert_eq!(task.group_id, "g1");
/// assert!(!task.finished);
/// ```
pub struct ResourceService<R: Resource, S: DocumentStore + ?Sized = dyn DocumentStore> {
    store: Arc<S>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, S: DocumentStore + ?Sized> Clone for ResourceService<R, S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), _resource: PhantomData }
    }
}

impl<R: Resource, S: DocumentStore + ?Sized> ResourceService<R, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store, _resource: PhantomData }
    }

    #[instrument(skip(self), fields(entity = R::ENTITY))]
    pub async fn find_by_id(&self, id: &str) -> Result<R::Dto, ServiceError> {
        let doc = self
            .store
            .find_by_id(R::COLLECTION, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::ENTITY))?;
        to_dto::<R>(&doc)
    }

    /// List documents, filtered by parent id for child collections.
    /// A parent id passed to a top-level collection is ignored.
    #[instrument(skip(self), fields(entity = R::ENTITY))]
    pub async fn find_all(&self, parent_id: Option<&str>) -> Result<Vec<R::Dto>, ServiceError> {
        let parent_id = R::COLLECTION.parent_field().and(parent_id);
        let docs = self.store.find(R::COLLECTION, parent_id).await?;
        debug!(count = docs.len(), "listed documents");
        docs.iter().map(to_dto::<R>).collect()
    }

    /// Validate `input` and persist it, attaching the parent reference for child
    /// collections. The parent's existence is not checked.
    #[instrument(skip(self, input), fields(entity = R::ENTITY))]
    pub async fn create(&self, parent_id: Option<&str>, input: &Value) -> Result<R::Dto, ServiceError> {
        let mut fields = assert_valid(R::create_schema(), input)?;
        if let Some(field) = R::COLLECTION.parent_field() {
            let Some(parent_id) = parent_id else {
                debug!(field, "create without parent reference");
                return Err(ServiceError::validation_failed());
            };
            fields.insert(field.to_string(), Value::String(parent_id.to_string()));
        }
        R::apply_defaults(&mut fields);

        let doc = self.store.insert(R::COLLECTION, fields).await?;
        info!(id = %doc.id, "created");
        to_dto::<R>(&doc)
    }

    /// Apply a partial update. Parent references are not part of any update
    /// schema, so a patch naming one fails validation.
    #[instrument(skip(self, patch), fields(entity = R::ENTITY))]
    pub async fn update_by_id(&self, id: &str, patch: &Value) -> Result<R::Dto, ServiceError> {
        let changes = assert_valid(R::update_schema(), patch)?;
        let update = build_update(&changes);
        let doc = self
            .store
            .update_by_id(R::COLLECTION, id, &update)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::ENTITY))?;
        info!(fields = update.set.len(), "updated");
        to_dto::<R>(&doc)
    }

    /// Remove one document. Children referencing it are left in place.
    #[instrument(skip(self), fields(entity = R::ENTITY))]
    pub async fn delete_by_id(&self, id: &str) -> Result<(), ServiceError> {
        self.store
            .delete_by_id(R::COLLECTION, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::ENTITY))?;
        info!("deleted");
        Ok(())
    }
}

fn to_dto<R: Resource>(doc: &Document) -> Result<R::Dto, ServiceError> {
    Ok(R::Dto::try_from(doc)?)
}
