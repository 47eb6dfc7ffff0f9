//! Bulk import models.

use serde::{Deserialize, Serialize};
use vidreview_core::importer::ImportRow;

/// Request body for a bulk import.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    pub rows: Vec<ImportRow>,
    /// Clear existing projects, reviews, workflow rows and screenshots first.
    #[serde(default)]
    pub replace: bool,
}

/// Counts of rows written by one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub projects_created: usize,
    pub reviews_created: usize,
    pub replaced: bool,
}
