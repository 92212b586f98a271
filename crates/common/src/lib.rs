//! Runtime helpers shared by every crate in the workspace: tracing setup and
//! data directory checks.

pub mod env;
pub mod utils;
