//! Repository for the `video_projects` table.

use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use vidreview_core::types::{new_id, Timestamp};
use vidreview_core::workflow::STAGE_AFTER_ARTWORK_UPLOAD;

use crate::models::project::{ArtworkAttachment, NewProject, Project};
use crate::models::workflow::{NewWorkflow, WorkflowStatus};
use crate::repositories::workflow_repo::{WorkflowRepo, WORKFLOW_COLUMNS};

/// Column list for video_projects queries.
pub(crate) const PROJECT_COLUMNS: &str = "id, provide_date, selection_date, brand_name, \
    category_level1, category_level2, category_level3, video_url, product_id, product_url, \
    material_name_vip, material_name_full, material_price, selling_points, \
    artwork_video_url, artwork_uploaded_at, created_at, updated_at";

/// Provides CRUD operations for video projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project and its initial workflow row in one transaction.
    pub async fn create(
        pool: &SqlitePool,
        input: &NewProject,
        workflow: &NewWorkflow,
        now: Timestamp,
    ) -> Result<(Project, WorkflowStatus), sqlx::Error> {
        let mut tx = crate::begin_write(pool).await?;
        let project = Self::insert(&mut *tx, input, now).await?;
        let status = WorkflowRepo::insert(&mut *tx, &project.id, workflow, now).await?;
        tx.commit().await?;
        Ok((project, status))
    }

    /// Find a project by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM video_projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a project with the given ID exists.
    pub async fn exists(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::exists_in(&mut conn, id).await
    }

    /// Record an uploaded artwork video and queue the project for UED review.
    ///
    /// Overwrites any previous artwork URL. Moving off `completed` clears the
    /// uploaded flag so the cache stays derivable. Returns `None` if the
    /// project does not exist.
    pub async fn attach_artwork(
        pool: &SqlitePool,
        id: &str,
        video_url: &str,
        now: Timestamp,
    ) -> Result<Option<ArtworkAttachment>, sqlx::Error> {
        let mut tx = crate::begin_write(pool).await?;

        let query = format!(
            "UPDATE video_projects SET
                artwork_video_url = $1,
                artwork_uploaded_at = $2,
                updated_at = $2
             WHERE id = $3
             RETURNING {PROJECT_COLUMNS}"
        );
        let Some(project) = sqlx::query_as::<_, Project>(&query)
            .bind(video_url)
            .bind(now)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO workflow_status (project_id, current_stage, completion_status, version, updated_at)
             VALUES ($1, $2, 'not_uploaded', 1, $3)
             ON CONFLICT (project_id) DO UPDATE SET
                current_stage = excluded.current_stage,
                completion_status = excluded.completion_status,
                version = workflow_status.version + 1,
                updated_at = excluded.updated_at
             RETURNING {WORKFLOW_COLUMNS}"
        );
        let workflow = sqlx::query_as::<_, WorkflowStatus>(&query)
            .bind(id)
            .bind(STAGE_AFTER_ARTWORK_UPLOAD.as_str())
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(ArtworkAttachment { project, workflow }))
    }

    pub(crate) async fn exists_in(conn: &mut SqliteConnection, id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM video_projects WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await
    }

    pub(crate) async fn insert(
        conn: &mut SqliteConnection,
        input: &NewProject,
        now: Timestamp,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO video_projects
                (id, provide_date, selection_date, brand_name,
                 category_level1, category_level2, category_level3,
                 video_url, product_id, product_url,
                 material_name_vip, material_name_full, material_price, selling_points,
                 created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
             RETURNING {PROJECT_COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(new_id())
            .bind(input.provide_date)
            .bind(input.selection_date)
            .bind(&input.brand_name)
            .bind(&input.category_level1)
            .bind(&input.category_level2)
            .bind(&input.category_level3)
            .bind(&input.video_url)
            .bind(&input.product_id)
            .bind(&input.product_url)
            .bind(&input.material_name_vip)
            .bind(&input.material_name_full)
            .bind(input.material_price)
            .bind(Json(&input.selling_points))
            .bind(now)
            .fetch_one(conn)
            .await
    }
}
