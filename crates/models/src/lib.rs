//! Domain types shared by the workspace: the three collections, the stored
//! document shape, entity DTOs, and the sea-orm `document` entity.

pub mod errors;
pub mod db;
pub mod record;
pub mod document;
pub mod group;
pub mod task;
pub mod milestone;

pub use record::{Collection, Document};
