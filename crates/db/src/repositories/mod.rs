//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument. Writes that touch more than
//! one row run in a single transaction and report a missing project as
//! `Ok(None)`.

pub mod import_repo;
pub mod listing_repo;
pub mod project_repo;
pub mod review_repo;
pub mod screenshot_repo;
pub mod workflow_repo;

pub use import_repo::ImportRepo;
pub use listing_repo::ListingRepo;
pub use project_repo::ProjectRepo;
pub use review_repo::ReviewRepo;
pub use screenshot_repo::ScreenshotRepo;
pub use workflow_repo::WorkflowRepo;
