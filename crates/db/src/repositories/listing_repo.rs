//! Joined project views, filtered listing, and aggregate statistics.

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};
use vidreview_core::types::{Date, DbId};
use vidreview_core::workflow::{CompletionStatus, DerivedStatus, ReviewType, Stage};

use crate::models::listing::{ProjectFilter, ProjectOverview, ProjectOverviewRow, Statistics};
use crate::models::screenshot::Screenshot;
use crate::repositories::project_repo::PROJECT_COLUMNS;
use crate::repositories::review_repo::latest_status_subquery;
use crate::repositories::screenshot_repo::ScreenshotRepo;

/// Provides the read-side views used by listing and statistics.
pub struct ListingRepo;

impl ListingRepo {
    /// List projects matching every filter, newest first, with screenshots
    /// grouped by review type. Runs in one read transaction.
    pub async fn list(
        pool: &SqlitePool,
        filter: &ProjectFilter,
    ) -> Result<Vec<ProjectOverview>, sqlx::Error> {
        let (where_clause, bind_values) = build_project_filter(filter);
        let query = format!(
            "SELECT * FROM ({}) AS v{where_clause}
             ORDER BY v.created_at DESC, v.row_order DESC",
            overview_select()
        );

        let mut tx = pool.begin().await?;
        let rows = bind_filter_values(sqlx::query_as::<_, ProjectOverviewRow>(&query), &bind_values)
            .fetch_all(&mut *tx)
            .await?;
        let overviews = attach_screenshots(&mut *tx, rows).await?;
        tx.commit().await?;
        Ok(overviews)
    }

    /// One project with its workflow fields, derived statuses and screenshots.
    pub async fn find(
        pool: &SqlitePool,
        project_id: &str,
    ) -> Result<Option<ProjectOverview>, sqlx::Error> {
        let query = format!("SELECT * FROM ({}) AS v WHERE v.id = $1", overview_select());

        let mut tx = pool.begin().await?;
        let row = sqlx::query_as::<_, ProjectOverviewRow>(&query)
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut overviews = attach_screenshots(&mut *tx, vec![row]).await?;
        tx.commit().await?;
        Ok(overviews.pop())
    }

    /// Aggregate counts, snapshotted in one read transaction.
    pub async fn statistics(pool: &SqlitePool) -> Result<Statistics, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let total = count(&mut *tx, "SELECT COUNT(*) FROM video_projects", None).await?;
        let completion =
            "SELECT COUNT(*) FROM workflow_status WHERE completion_status = $1";
        let stage = "SELECT COUNT(*) FROM workflow_status WHERE current_stage = $1";

        let stats = Statistics {
            total,
            completed: count(&mut *tx, completion, Some(CompletionStatus::Uploaded.as_str())).await?,
            pending: count(&mut *tx, completion, Some(CompletionStatus::NotUploaded.as_str()))
                .await?,
            annotation_pending: count(&mut *tx, stage, Some(Stage::AnnotationReview.as_str()))
                .await?,
            ued_pending: count(&mut *tx, stage, Some(Stage::UedReview.as_str())).await?,
            artwork_pending: count(&mut *tx, stage, Some(Stage::Artwork.as_str())).await?,
        };

        tx.commit().await?;
        Ok(stats)
    }
}

/// The joined projection every listing query filters and orders over.
fn overview_select() -> String {
    format!(
        "SELECT {columns}, p.rowid AS row_order,
                w.current_stage, w.annotation_reviewer, w.ued_reviewer, w.artwork_person,
                w.completion_status,
                {annotation} AS annotation_status,
                {ued} AS ued_status
         FROM video_projects p
         LEFT JOIN workflow_status w ON w.project_id = p.id",
        columns = qualified_project_columns(),
        annotation = latest_status_subquery("p.id", ReviewType::Annotation),
        ued = latest_status_subquery("p.id", ReviewType::Ued),
    )
}

fn qualified_project_columns() -> String {
    PROJECT_COLUMNS
        .split(',')
        .map(|c| format!("p.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

async fn count(
    conn: &mut SqliteConnection,
    query: &str,
    value: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let mut q = sqlx::query_scalar::<_, i64>(query);
    if let Some(value) = value {
        q = q.bind(value);
    }
    q.fetch_one(conn).await
}

/// Load screenshots for the given rows and convert them into overviews.
async fn attach_screenshots(
    conn: &mut SqliteConnection,
    rows: Vec<ProjectOverviewRow>,
) -> Result<Vec<ProjectOverview>, sqlx::Error> {
    let ids: Vec<DbId> = rows.iter().map(|r| r.project.id.clone()).collect();
    let mut by_project: HashMap<DbId, Vec<Screenshot>> = HashMap::new();
    for shot in ScreenshotRepo::list_for_projects(conn, &ids).await? {
        by_project.entry(shot.project_id.clone()).or_default().push(shot);
    }

    rows.into_iter()
        .map(|row| -> Result<ProjectOverview, sqlx::Error> {
            let mut overview =
                ProjectOverview::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            let (annotation, ued): (Vec<Screenshot>, Vec<Screenshot>) = by_project
                .remove(&overview.project.id)
                .unwrap_or_default()
                .into_iter()
                .partition(|s| s.review_type == ReviewType::Annotation);
            overview.annotation_screenshots = annotation;
            overview.ued_screenshots = ued;
            Ok(overview)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Filter building
// ---------------------------------------------------------------------------

/// Typed bind value for the dynamic listing filter.
enum BindValue {
    Text(String),
    Date(Date),
}

/// Build the WHERE clause and bind values for a [`ProjectFilter`].
///
/// Conditions reference the columns of the `v` projection and combine with
/// AND; a derived status of `not_reviewed` matches a NULL latest status.
fn build_project_filter(filter: &ProjectFilter) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(status) = filter.completion_status {
        conditions.push(format!("v.completion_status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(status.as_str().to_string()));
    }

    if let Some(stage) = filter.stage {
        conditions.push(format!("v.current_stage = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(stage.as_str().to_string()));
    }

    if let Some(ref reviewer) = filter.reviewer {
        conditions.push(format!(
            "(v.annotation_reviewer = ${} OR v.ued_reviewer = ${} OR v.artwork_person = ${})",
            bind_idx,
            bind_idx + 1,
            bind_idx + 2
        ));
        bind_idx += 3;
        for _ in 0..3 {
            bind_values.push(BindValue::Text(reviewer.clone()));
        }
    }

    if let Some(ref person) = filter.artwork_person {
        conditions.push(format!("v.artwork_person = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(person.clone()));
    }

    if let Some(ref brand) = filter.brand {
        conditions.push(format!("v.brand_name = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(brand.clone()));
    }

    if let Some(ref product_id) = filter.product_id {
        conditions.push(format!("v.product_id LIKE ${bind_idx} ESCAPE '\\'"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{}%", escape_like(product_id))));
    }

    let date_bounds = [
        ("provide_date", ">=", filter.provide_date_start),
        ("provide_date", "<=", filter.provide_date_end),
        ("selection_date", ">=", filter.selection_date_start),
        ("selection_date", "<=", filter.selection_date_end),
    ];
    for (column, op, bound) in date_bounds {
        if let Some(date) = bound {
            conditions.push(format!("v.{column} {op} ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Date(date));
        }
    }

    for (column, derived) in [
        ("annotation_status", filter.annotation_status),
        ("ued_status", filter.ued_status),
    ] {
        match derived.map(DerivedStatus::review_status) {
            None => {}
            Some(None) => conditions.push(format!("v.{column} IS NULL")),
            Some(Some(status)) => {
                conditions.push(format!("v.{column} = ${bind_idx}"));
                bind_idx += 1;
                bind_values.push(BindValue::Text(status.as_str().to_string()));
            }
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}

/// Escape LIKE wildcards so the product id is matched literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_filter_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}
