//! Persistence driver seam.
//!
//! [`DocumentStore`] is the only way services touch documents. Every
//! operation is atomic for a single document; nothing spans documents.

use async_trait::async_trait;
use models::{Collection, Document};
use serde_json::{Map, Value};

use crate::errors::ServiceError;
use crate::patch::UpdateInstruction;

pub mod collections;
pub mod memory;
pub mod json_file;
#[cfg(feature = "seaorm")]
pub mod seaorm;

pub use json_file::JsonFileDocumentStore;
pub use memory::MemoryDocumentStore;
#[cfg(feature = "seaorm")]
pub use self::seaorm::SeaOrmDocumentStore;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, ServiceError>;

    /// All documents of `collection`, or only those whose parent reference equals `parent_id`.
    async fn find(&self, collection: Collection, parent_id: Option<&str>) -> Result<Vec<Document>, ServiceError>;

    /// Persist a new document under a freshly generated id.
    async fn insert(&self, collection: Collection, fields: Map<String, Value>) -> Result<Document, ServiceError>;

    /// Returns the document after the update, or `None` if `id` is unknown.
    async fn update_by_id(&self, collection: Collection, id: &str, update: &UpdateInstruction) -> Result<Option<Document>, ServiceError>;

    /// Returns the removed document, or `None` if `id` is unknown.
    async fn delete_by_id(&self, collection: Collection, id: &str) -> Result<Option<Document>, ServiceError>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
