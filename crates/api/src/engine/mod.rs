//! Transition engine.
//!
//! The single write path for the review pipeline. Each operation validates
//! its input before touching anything, checks that the project exists,
//! performs its writes in one repository transaction and emits one `info!`
//! event. Upload operations store the blob first and delete it again if the
//! database write fails.

mod assets;
mod consistency;
mod projects;
mod reviews;
mod workflow;

use std::sync::Arc;

use validator::Validate;
use vidreview_core::assets::AssetStore;
use vidreview_core::error::CoreError;
use vidreview_db::DbPool;

/// Applies review submissions, administrative edits and uploads to the store.
#[derive(Clone)]
pub struct WorkflowEngine {
    pool: DbPool,
    assets: Arc<dyn AssetStore>,
}

impl WorkflowEngine {
    pub fn new(pool: DbPool, assets: Arc<dyn AssetStore>) -> Self {
        Self { pool, assets }
    }

    /// Best-effort removal of a blob whose database record was not written.
    async fn discard_asset(&self, public_path: &str) {
        match self.assets.delete(public_path).await {
            Ok(()) => tracing::info!(path = public_path, "Removed orphaned asset"),
            Err(err) => {
                tracing::warn!(path = public_path, error = %err, "Failed to remove orphaned asset")
            }
        }
    }
}

/// Run derive-based validation, flattening the errors into one message.
fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(errors.to_string()))
}
