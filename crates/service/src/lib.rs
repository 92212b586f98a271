//! Resource service layer for groups, tasks and milestones.
//! - Validates request documents before they reach persistence.
//! - Turns sparse patches into update instructions.
//! - Maps stored documents to DTOs and reports typed failures.

pub mod errors;
pub mod validation;
pub mod patch;
pub mod storage;
pub mod resource;
pub mod runtime;
#[cfg(all(test, feature = "seaorm"))]
pub mod test_support;

pub use errors::{ErrorKind, ServiceError};
pub use resource::{GroupService, MilestoneService, ResourceService, TaskService};
pub use runtime::{bootstrap, Services};
pub use storage::DocumentStore;
