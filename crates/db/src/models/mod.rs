//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` input DTOs for the writes that touch that table

pub mod import;
pub mod listing;
pub mod project;
pub mod review;
pub mod screenshot;
pub mod workflow;
