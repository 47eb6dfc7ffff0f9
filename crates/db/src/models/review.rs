//! Review record models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vidreview_core::derivation::ReviewEvent;
use vidreview_core::types::{DbId, Timestamp};
use vidreview_core::workflow::{ReviewStatus, ReviewType};

use crate::models::workflow::WorkflowStatus;

/// A row from the `review_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewRecord {
    pub id: DbId,
    pub project_id: DbId,
    #[sqlx(try_from = "String")]
    pub review_type: ReviewType,
    pub reviewer_name: String,
    #[sqlx(try_from = "String")]
    pub review_status: ReviewStatus,
    pub problem_description: Option<String>,
    pub screenshot_path: Option<String>,
    pub review_time: Timestamp,
    pub seq: i64,
}

impl ReviewRecord {
    /// The slice of this record that status derivation works on.
    pub fn event(&self) -> ReviewEvent {
        ReviewEvent {
            review_type: self.review_type,
            status: self.review_status,
            review_time: self.review_time,
            seq: self.seq,
        }
    }
}

/// Request body for submitting a review. Labels are parsed by the engine.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitReview {
    #[validate(length(min = 1, message = "project_id must not be empty"))]
    pub project_id: DbId,
    pub review_type: String,
    #[validate(length(min = 1, max = 100, message = "reviewer_name must be 1-100 characters"))]
    pub reviewer_name: String,
    pub review_status: String,
    #[validate(length(max = 10000, message = "problem_description is too long"))]
    pub problem_description: Option<String>,
    pub screenshot_path: Option<String>,
}

/// Validated review ready to be appended to the log.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub project_id: DbId,
    pub review_type: ReviewType,
    pub reviewer_name: String,
    pub review_status: ReviewStatus,
    pub problem_description: Option<String>,
    pub screenshot_path: Option<String>,
    pub review_time: Timestamp,
}

/// Result of a review submission: the appended record and the updated cache row.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSubmission {
    pub review: ReviewRecord,
    pub workflow: WorkflowStatus,
}
