use chrono::Utc;
use vidreview_core::derivation::{derive_stage, ReviewEvent, StageConsistency};
use vidreview_core::error::CoreError;
use vidreview_core::workflow::Stage;
use vidreview_db::models::workflow::WorkflowStatus;
use vidreview_db::repositories::{ProjectRepo, ReviewRepo, WorkflowRepo};

use super::WorkflowEngine;
use crate::error::AppResult;

impl WorkflowEngine {
    /// Stage implied by the review log, the artwork upload and the cached
    /// completion flag. Pure read; nothing is written.
    pub async fn recompute(&self, project_id: &str) -> AppResult<Stage> {
        let (_, derived) = self.cached_and_derived(project_id).await?;
        Ok(derived)
    }

    /// Compare the cached stage with the derived one.
    pub async fn check_consistency(&self, project_id: &str) -> AppResult<StageConsistency> {
        let (workflow, derived) = self.cached_and_derived(project_id).await?;
        let report = StageConsistency::new(workflow.current_stage, derived);
        if !report.consistent {
            tracing::warn!(
                project_id,
                cached = %report.cached,
                derived = %report.derived,
                "Workflow cache drifted from review log"
            );
        }
        Ok(report)
    }

    /// Overwrite the cached stage with the derived one when they differ.
    pub async fn resync(&self, project_id: &str) -> AppResult<WorkflowStatus> {
        let (workflow, derived) = self.cached_and_derived(project_id).await?;
        if workflow.current_stage == derived {
            return Ok(workflow);
        }

        let updated = WorkflowRepo::set_stage(
            &self.pool,
            project_id,
            workflow.version,
            derived,
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
            from_stage = %workflow.current_stage,
            stage = %updated.current_stage,
            "Workflow stage resynchronised"
        );

        Ok(updated)
    }

    async fn cached_and_derived(&self, project_id: &str) -> AppResult<(WorkflowStatus, Stage)> {
        let project = ProjectRepo::find_by_id(&self.pool, project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", project_id))?;
        let workflow = WorkflowRepo::find(&self.pool, project_id)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!("Project {project_id} has no workflow row"))
            })?;
        let events: Vec<ReviewEvent> = ReviewRepo::list_for_project(&self.pool, project_id)
            .await?
            .iter()
            .map(|r| r.event())
            .collect();

        let derived = derive_stage(
            &events,
            project.artwork_uploaded_at,
            workflow.completion_status,
        );
        Ok((workflow, derived))
    }
}
