//! Repository for the `screenshots` table.

use sqlx::{SqliteConnection, SqlitePool};
use vidreview_core::types::{new_id, Timestamp};
use vidreview_core::workflow::ReviewType;

use crate::models::screenshot::Screenshot;
use crate::repositories::project_repo::ProjectRepo;

/// Column list for screenshots queries.
const SCREENSHOT_COLUMNS: &str = "id, project_id, review_type, screenshot_path, created_at";

/// Upper bound on ids per `IN (...)` list.
const ID_CHUNK_SIZE: usize = 500;

/// Provides CRUD operations for screenshots.
pub struct ScreenshotRepo;

impl ScreenshotRepo {
    /// Insert a screenshot row. Returns `None` if the project does not exist.
    pub async fn create(
        pool: &SqlitePool,
        project_id: &str,
        review_type: ReviewType,
        screenshot_path: &str,
        now: Timestamp,
    ) -> Result<Option<Screenshot>, sqlx::Error> {
        let mut tx = crate::begin_write(pool).await?;

        if !ProjectRepo::exists_in(&mut *tx, project_id).await? {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO screenshots (id, project_id, review_type, screenshot_path, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SCREENSHOT_COLUMNS}"
        );
        let screenshot = sqlx::query_as::<_, Screenshot>(&query)
            .bind(new_id())
            .bind(project_id)
            .bind(review_type.as_str())
            .bind(screenshot_path)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(screenshot))
    }

    /// Screenshots of every listed project, newest first.
    pub(crate) async fn list_for_projects(
        conn: &mut SqliteConnection,
        project_ids: &[String],
    ) -> Result<Vec<Screenshot>, sqlx::Error> {
        let mut screenshots = Vec::new();
        for chunk in project_ids.chunks(ID_CHUNK_SIZE) {
            let placeholders = (1..=chunk.len())
                .map(|i| format!("${i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let query = format!(
                "SELECT {SCREENSHOT_COLUMNS} FROM screenshots
                 WHERE project_id IN ({placeholders})
                 ORDER BY created_at DESC, rowid DESC"
            );
            let mut q = sqlx::query_as::<_, Screenshot>(&query);
            for id in chunk {
                q = q.bind(id);
            }
            screenshots.extend(q.fetch_all(&mut *conn).await?);
        }
        Ok(screenshots)
    }
}
