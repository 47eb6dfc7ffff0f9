//! Joined project views and aggregate counts for the listing layer.

use serde::Serialize;
use sqlx::FromRow;
use vidreview_core::error::CoreError;
use vidreview_core::types::Date;
use vidreview_core::workflow::{CompletionStatus, DerivedStatus, ReviewStatus, Stage};

use crate::models::project::Project;
use crate::models::screenshot::Screenshot;

/// Conjunctive listing filters. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub completion_status: Option<CompletionStatus>,
    pub stage: Option<Stage>,
    /// Matches any of the three assignee roles.
    pub reviewer: Option<String>,
    pub artwork_person: Option<String>,
    pub brand: Option<String>,
    /// Substring match.
    pub product_id: Option<String>,
    pub provide_date_start: Option<Date>,
    pub provide_date_end: Option<Date>,
    pub selection_date_start: Option<Date>,
    pub selection_date_end: Option<Date>,
    pub annotation_status: Option<DerivedStatus>,
    pub ued_status: Option<DerivedStatus>,
}

/// Raw row of the listing query. Workflow columns are nullable because of
/// the left join; derived statuses are null when no review exists.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectOverviewRow {
    #[sqlx(flatten)]
    pub project: Project,
    pub current_stage: Option<String>,
    pub annotation_reviewer: Option<String>,
    pub ued_reviewer: Option<String>,
    pub artwork_person: Option<String>,
    pub completion_status: Option<String>,
    pub annotation_status: Option<String>,
    pub ued_status: Option<String>,
}

/// A project with its workflow fields, derived statuses and screenshots.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectOverview {
    #[serde(flatten)]
    pub project: Project,
    pub current_stage: Option<Stage>,
    pub annotation_reviewer: Option<String>,
    pub ued_reviewer: Option<String>,
    pub artwork_person: Option<String>,
    pub completion_status: Option<CompletionStatus>,
    pub annotation_status: DerivedStatus,
    pub ued_status: DerivedStatus,
    pub annotation_screenshots: Vec<Screenshot>,
    pub ued_screenshots: Vec<Screenshot>,
}

impl TryFrom<ProjectOverviewRow> for ProjectOverview {
    type Error = CoreError;

    fn try_from(row: ProjectOverviewRow) -> Result<Self, Self::Error> {
        let derived = |raw: Option<String>| -> Result<DerivedStatus, CoreError> {
            Ok(raw
                .as_deref()
                .map(ReviewStatus::parse)
                .transpose()?
                .into())
        };

        Ok(ProjectOverview {
            current_stage: row.current_stage.as_deref().map(Stage::parse).transpose()?,
            completion_status: row
                .completion_status
                .as_deref()
                .map(CompletionStatus::parse)
                .transpose()?,
            annotation_status: derived(row.annotation_status)?,
            ued_status: derived(row.ued_status)?,
            project: row.project,
            annotation_reviewer: row.annotation_reviewer,
            ued_reviewer: row.ued_reviewer,
            artwork_person: row.artwork_person,
            annotation_screenshots: Vec::new(),
            ued_screenshots: Vec::new(),
        })
    }
}

/// Aggregate counts over the workflow cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: i64,
    pub completed: i64,
    /// Projects whose finished asset is not uploaded yet.
    pub pending: i64,
    pub annotation_pending: i64,
    pub ued_pending: i64,
    pub artwork_pending: i64,
}
