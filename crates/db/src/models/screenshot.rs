//! Screenshot evidence models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vidreview_core::types::{DbId, Timestamp};
use vidreview_core::workflow::ReviewType;

/// A row from the `screenshots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Screenshot {
    pub id: DbId,
    pub project_id: DbId,
    #[sqlx(try_from = "String")]
    pub review_type: ReviewType,
    pub screenshot_path: String,
    pub created_at: Timestamp,
}

/// Request body for saving a screenshot.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveScreenshot {
    pub review_type: String,
    /// Raw base64 or a `data:image/...;base64,` URL.
    pub image_data: String,
}
