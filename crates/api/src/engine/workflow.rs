use chrono::Utc;
use vidreview_core::error::CoreError;
use vidreview_core::project::{non_blank, validate_person_name};
use vidreview_core::workflow::{resolve_workflow_update, CompletionStatus, Stage};
use vidreview_db::models::project::ArtworkAttachment;
use vidreview_db::models::workflow::{UpdateWorkflow, WorkflowChanges, WorkflowStatus};
use vidreview_db::repositories::{ProjectRepo, WorkflowRepo};

use super::WorkflowEngine;
use crate::error::AppResult;

impl WorkflowEngine {
    /// Administrative override of the cached workflow row.
    ///
    /// Absent fields keep their value and `updated_at` is always refreshed.
    /// This path can move the cache away from what the review log implies;
    /// [`check_consistency`](Self::check_consistency) reports such drift.
    pub async fn update_workflow(
        &self,
        project_id: &str,
        input: UpdateWorkflow,
    ) -> AppResult<WorkflowStatus> {
        let requested_stage = non_blank(input.current_stage.as_deref())
            .map(|s| Stage::parse(&s))
            .transpose()?;
        let requested_completion = non_blank(input.completion_status.as_deref())
            .map(|s| CompletionStatus::parse(&s))
            .transpose()?;
        let artwork_person = assignee("artwork_person", input.artwork_person.as_deref())?;
        let annotation_reviewer =
            assignee("annotation_reviewer", input.annotation_reviewer.as_deref())?;
        let ued_reviewer = assignee("ued_reviewer", input.ued_reviewer.as_deref())?;

        let current = WorkflowRepo::find(&self.pool, project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", project_id))?;

        let (current_stage, completion_status) = resolve_workflow_update(
            current.current_stage,
            current.completion_status,
            requested_stage,
            requested_completion,
        )?;

        let changes = WorkflowChanges {
            current_stage,
            completion_status,
            artwork_person,
            annotation_reviewer,
            ued_reviewer,
        };
        let updated = WorkflowRepo::update(
            &self.pool,
            project_id,
            current.version,
            &changes,
            Utc::now(),
        )
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "Workflow of project {project_id} was modified concurrently; retry"
            ))
        })?;

        tracing::info!(
            project_id,
            from_stage = %current.current_stage,
            stage = %updated.current_stage,
            completion_status = %updated.completion_status,
            "Workflow updated"
        );

        Ok(updated)
    }

    /// Record an uploaded artwork video and queue the project for UED review.
    ///
    /// Repeated calls keep the stage at `ued_review` and overwrite the URL.
    pub async fn attach_artwork_video(
        &self,
        project_id: &str,
        video_url: &str,
    ) -> AppResult<ArtworkAttachment> {
        let video_url = video_url.trim();
        if video_url.is_empty() {
            return Err(
                CoreError::Validation("Artwork video URL must not be empty".to_string()).into(),
            );
        }

        let attachment = ProjectRepo::attach_artwork(&self.pool, project_id, video_url, Utc::now())
            .await?
            .ok_or_else(|| CoreError::not_found("Project", project_id))?;

        tracing::info!(
            project_id,
            video_url,
            stage = %attachment.workflow.current_stage,
            "Artwork video attached"
        );

        Ok(attachment)
    }
}

/// Normalise and validate an optional assignee name.
fn assignee(field: &str, value: Option<&str>) -> Result<Option<String>, CoreError> {
    let name = non_blank(value);
    if let Some(ref name) = name {
        validate_person_name(field, name)?;
    }
    Ok(name)
}
