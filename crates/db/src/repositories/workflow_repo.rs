//! Repository for the `workflow_status` table.

use sqlx::{SqliteConnection, SqlitePool};
use vidreview_core::types::Timestamp;
use vidreview_core::workflow::Stage;

use crate::models::workflow::{NewWorkflow, WorkflowChanges, WorkflowStatus};

/// Column list for workflow_status queries.
pub(crate) const WORKFLOW_COLUMNS: &str = "project_id, current_stage, annotation_reviewer, \
    ued_reviewer, artwork_person, completion_status, version, updated_at";

/// Provides read and write operations for the workflow status cache.
pub struct WorkflowRepo;

impl WorkflowRepo {
    /// Find the workflow row of a project.
    pub async fn find(
        pool: &SqlitePool,
        project_id: &str,
    ) -> Result<Option<WorkflowStatus>, sqlx::Error> {
        let query = format!("SELECT {WORKFLOW_COLUMNS} FROM workflow_status WHERE project_id = $1");
        sqlx::query_as::<_, WorkflowStatus>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply resolved administrative changes if the row is still at
    /// `expected_version`.
    ///
    /// Assignee fields that are `None` keep their stored value. Returns
    /// `None` when the row is missing or was written concurrently.
    pub async fn update(
        pool: &SqlitePool,
        project_id: &str,
        expected_version: i64,
        changes: &WorkflowChanges,
        now: Timestamp,
    ) -> Result<Option<WorkflowStatus>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_status SET
                current_stage = $1,
                completion_status = $2,
                artwork_person = COALESCE($3, artwork_person),
                annotation_reviewer = COALESCE($4, annotation_reviewer),
                ued_reviewer = COALESCE($5, ued_reviewer),
                version = version + 1,
                updated_at = $6
             WHERE project_id = $7 AND version = $8
             RETURNING {WORKFLOW_COLUMNS}"
        );
        let mut tx = crate::begin_write(pool).await?;
        let updated = sqlx::query_as::<_, WorkflowStatus>(&query)
            .bind(changes.current_stage.as_str())
            .bind(changes.completion_status.as_str())
            .bind(&changes.artwork_person)
            .bind(&changes.annotation_reviewer)
            .bind(&changes.ued_reviewer)
            .bind(now)
            .bind(project_id)
            .bind(expected_version)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Overwrite the cached stage if the row is still at `expected_version`.
    pub async fn set_stage(
        pool: &SqlitePool,
        project_id: &str,
        expected_version: i64,
        stage: Stage,
        now: Timestamp,
    ) -> Result<Option<WorkflowStatus>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_status SET
                current_stage = $1,
                version = version + 1,
                updated_at = $2
             WHERE project_id = $3 AND version = $4
             RETURNING {WORKFLOW_COLUMNS}"
        );
        let mut tx = crate::begin_write(pool).await?;
        let updated = sqlx::query_as::<_, WorkflowStatus>(&query)
            .bind(stage.as_str())
            .bind(now)
            .bind(project_id)
            .bind(expected_version)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(updated)
    }

    pub(crate) async fn insert(
        conn: &mut SqliteConnection,
        project_id: &str,
        input: &NewWorkflow,
        now: Timestamp,
    ) -> Result<WorkflowStatus, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_status
                (project_id, current_stage, completion_status, annotation_reviewer, artwork_person, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {WORKFLOW_COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowStatus>(&query)
            .bind(project_id)
            .bind(input.current_stage.as_str())
            .bind(input.completion_status.as_str())
            .bind(&input.annotation_reviewer)
            .bind(&input.artwork_person)
            .bind(now)
            .fetch_one(conn)
            .await
    }
}
