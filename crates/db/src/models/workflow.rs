//! Workflow status cache models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vidreview_core::types::{DbId, Timestamp};
use vidreview_core::workflow::{CompletionStatus, Stage};

/// A row from the `workflow_status` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowStatus {
    pub project_id: DbId,
    #[sqlx(try_from = "String")]
    pub current_stage: Stage,
    pub annotation_reviewer: Option<String>,
    pub ued_reviewer: Option<String>,
    pub artwork_person: Option<String>,
    #[sqlx(try_from = "String")]
    pub completion_status: CompletionStatus,
    pub version: i64,
    pub updated_at: Timestamp,
}

/// Administrative patch of the workflow row. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkflow {
    pub current_stage: Option<String>,
    pub artwork_person: Option<String>,
    pub annotation_reviewer: Option<String>,
    pub ued_reviewer: Option<String>,
    pub completion_status: Option<String>,
}

/// Fully resolved values written by an administrative update.
#[derive(Debug, Clone)]
pub struct WorkflowChanges {
    pub current_stage: Stage,
    pub completion_status: CompletionStatus,
    pub artwork_person: Option<String>,
    pub annotation_reviewer: Option<String>,
    pub ued_reviewer: Option<String>,
}

/// Initial cache row written alongside a new project.
#[derive(Debug, Clone, Default)]
pub struct NewWorkflow {
    pub current_stage: Stage,
    pub completion_status: CompletionStatus,
    pub annotation_reviewer: Option<String>,
    pub artwork_person: Option<String>,
}
