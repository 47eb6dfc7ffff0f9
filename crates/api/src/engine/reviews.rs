use chrono::Utc;
use vidreview_core::error::CoreError;
use vidreview_core::project::{non_blank, validate_person_name, validate_problem_description};
use vidreview_core::workflow::{DerivedStatus, ReviewStatus, ReviewType};
use vidreview_db::models::review::{NewReview, ReviewRecord, ReviewSubmission, SubmitReview};
use vidreview_db::repositories::{ProjectRepo, ReviewRepo};

use super::{validate_input, WorkflowEngine};
use crate::error::AppResult;

impl WorkflowEngine {
    /// Append a review and move the project to the stage that follows it.
    ///
    /// The outcome of the review does not matter for the stage: annotation
    /// always leads to `ued_review`, UED always to `artwork`.
    pub async fn submit_review(&self, input: SubmitReview) -> AppResult<ReviewSubmission> {
        validate_input(&input)?;
        let review_type = ReviewType::parse(&input.review_type)?;
        let review_status = ReviewStatus::parse(&input.review_status)?;
        let reviewer_name = input.reviewer_name.trim().to_string();
        validate_person_name("reviewer_name", &reviewer_name)?;
        validate_problem_description(input.problem_description.as_deref())?;

        let review = NewReview {
            project_id: input.project_id,
            review_type,
            reviewer_name,
            review_status,
            problem_description: non_blank(input.problem_description.as_deref()),
            screenshot_path: non_blank(input.screenshot_path.as_deref()),
            review_time: Utc::now(),
        };

        let submission = ReviewRepo::submit(&self.pool, &review)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", review.project_id.clone()))?;

        tracing::info!(
            project_id = %review.project_id,
            review_type = %review_type,
            review_status = %review_status,
            reviewer = %review.reviewer_name,
            stage = %submission.workflow.current_stage,
            "Review submitted"
        );

        Ok(submission)
    }

    /// The review log of a project, newest first.
    pub async fn list_reviews(&self, project_id: &str) -> AppResult<Vec<ReviewRecord>> {
        self.ensure_project_exists(project_id).await?;
        Ok(ReviewRepo::list_for_project(&self.pool, project_id).await?)
    }

    /// Effective status of one review type: the latest record's status, or
    /// `not_reviewed` when there is none.
    pub async fn effective_status(
        &self,
        project_id: &str,
        review_type: ReviewType,
    ) -> AppResult<DerivedStatus> {
        self.ensure_project_exists(project_id).await?;
        let status = ReviewRepo::effective_status(&self.pool, project_id, review_type).await?;
        Ok(status.into())
    }

    pub(super) async fn ensure_project_exists(&self, project_id: &str) -> AppResult<()> {
        if !ProjectRepo::exists(&self.pool, project_id).await? {
            return Err(CoreError::not_found("Project", project_id).into());
        }
        Ok(())
    }
}
