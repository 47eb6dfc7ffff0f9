//! Repository for the append-only `review_records` log.

use sqlx::{SqliteConnection, SqlitePool};
use vidreview_core::types::new_id;
use vidreview_core::workflow::{ReviewStatus, ReviewType};

use crate::models::review::{NewReview, ReviewRecord, ReviewSubmission};
use crate::models::workflow::WorkflowStatus;
use crate::repositories::project_repo::ProjectRepo;
use crate::repositories::workflow_repo::WORKFLOW_COLUMNS;

/// Column list for review_records queries.
const REVIEW_COLUMNS: &str = "id, project_id, review_type, reviewer_name, review_status, \
    problem_description, screenshot_path, review_time, seq";

/// Scalar subquery yielding the effective status of one review type for the
/// project whose id is the SQL expression `project_ref`.
///
/// Latest by `(review_time, seq)`; NULL when the project has no record of
/// that type. Shared by point lookups and the listing so both agree.
pub(crate) fn latest_status_subquery(project_ref: &str, review_type: ReviewType) -> String {
    format!(
        "(SELECT r.review_status FROM review_records r
          WHERE r.project_id = {project_ref} AND r.review_type = '{}'
          ORDER BY r.review_time DESC, r.seq DESC
          LIMIT 1)",
        review_type.as_str()
    )
}

/// Provides append and read operations for review records.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Append a review and move the cached stage, in one transaction.
    ///
    /// The stage becomes the review type's post-review stage, the reviewer is
    /// recorded as that type's assignee and the uploaded flag is cleared.
    /// Returns `None` if the project does not exist.
    pub async fn submit(
        pool: &SqlitePool,
        input: &NewReview,
    ) -> Result<Option<ReviewSubmission>, sqlx::Error> {
        let mut tx = crate::begin_write(pool).await?;

        if !ProjectRepo::exists_in(&mut *tx, &input.project_id).await? {
            return Ok(None);
        }

        let seq = Self::next_seq(&mut *tx).await?;
        let review = Self::insert(&mut *tx, input, seq).await?;

        let assignee_column = match input.review_type {
            ReviewType::Annotation => "annotation_reviewer",
            ReviewType::Ued => "ued_reviewer",
        };
        let query = format!(
            "INSERT INTO workflow_status
                (project_id, current_stage, {assignee_column}, completion_status, version, updated_at)
             VALUES ($1, $2, $3, 'not_uploaded', 1, $4)
             ON CONFLICT (project_id) DO UPDATE SET
                current_stage = excluded.current_stage,
                {assignee_column} = excluded.{assignee_column},
                completion_status = excluded.completion_status,
                version = workflow_status.version + 1,
                updated_at = excluded.updated_at
             RETURNING {WORKFLOW_COLUMNS}"
        );
        let workflow = sqlx::query_as::<_, WorkflowStatus>(&query)
            .bind(&input.project_id)
            .bind(input.review_type.stage_after_review().as_str())
            .bind(&input.reviewer_name)
            .bind(input.review_time)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(ReviewSubmission { review, workflow }))
    }

    /// List a project's reviews, newest first by `(review_time, seq)`.
    pub async fn list_for_project(
        pool: &SqlitePool,
        project_id: &str,
    ) -> Result<Vec<ReviewRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM review_records
             WHERE project_id = $1
             ORDER BY review_time DESC, seq DESC"
        );
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Effective status of one review type for a project; `None` when unreviewed.
    pub async fn effective_status(
        pool: &SqlitePool,
        project_id: &str,
        review_type: ReviewType,
    ) -> Result<Option<ReviewStatus>, sqlx::Error> {
        let query = format!("SELECT {}", latest_status_subquery("$1", review_type));
        let raw = sqlx::query_scalar::<_, Option<String>>(&query)
            .bind(project_id)
            .fetch_one(pool)
            .await?;
        raw.as_deref()
            .map(ReviewStatus::parse)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    pub(crate) async fn next_seq(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(seq), 0) + 1 FROM review_records")
            .fetch_one(conn)
            .await
    }

    pub(crate) async fn insert(
        conn: &mut SqliteConnection,
        input: &NewReview,
        seq: i64,
    ) -> Result<ReviewRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO review_records
                (id, project_id, review_type, reviewer_name, review_status,
                 problem_description, screenshot_path, review_time, seq)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {REVIEW_COLUMNS}"
        );
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(new_id())
            .bind(&input.project_id)
            .bind(input.review_type.as_str())
            .bind(&input.reviewer_name)
            .bind(input.review_status.as_str())
            .bind(&input.problem_description)
            .bind(&input.screenshot_path)
            .bind(input.review_time)
            .bind(seq)
            .fetch_one(conn)
            .await
    }
}
