//! Domain core for the video review pipeline.
//!
//! Everything in this crate is free of database access: closed
//! enumerations, the stage-transition rule, status derivation over an
//! in-memory review log, import-row planning, and the asset store seam.

pub mod assets;
pub mod derivation;
pub mod error;
pub mod importer;
pub mod project;
pub mod types;
pub mod workflow;
