use chrono::Utc;
use vidreview_core::error::CoreError;
use vidreview_core::importer::{plan_rows, ImportRow};
use vidreview_core::project::{validate_price, validate_required, validate_selling_points};
use vidreview_db::models::import::ImportSummary;
use vidreview_db::models::listing::{ProjectFilter, ProjectOverview, Statistics};
use vidreview_db::models::project::{CreateProject, NewProject};
use vidreview_db::models::workflow::NewWorkflow;
use vidreview_db::repositories::{ImportRepo, ListingRepo, ProjectRepo};

use super::{validate_input, WorkflowEngine};
use crate::error::AppResult;

impl WorkflowEngine {
    /// Create a project together with its `production` workflow row.
    pub async fn create_project(&self, input: CreateProject) -> AppResult<ProjectOverview> {
        validate_input(&input)?;
        validate_required("brand_name", &input.brand_name)?;
        validate_price(input.material_price)?;
        validate_selling_points(&input.selling_points)?;

        let new_project = NewProject::from(input);
        let (project, workflow) =
            ProjectRepo::create(&self.pool, &new_project, &NewWorkflow::default(), Utc::now())
                .await?;

        tracing::info!(
            project_id = %project.id,
            brand = project.brand_name.as_deref().unwrap_or_default(),
            stage = %workflow.current_stage,
            "Project created"
        );

        self.get_project(&project.id).await
    }

    pub async fn get_project(&self, project_id: &str) -> AppResult<ProjectOverview> {
        let overview = ListingRepo::find(&self.pool, project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", project_id))?;
        Ok(overview)
    }

    /// Projects matching every filter, newest first.
    pub async fn list_projects(&self, filter: &ProjectFilter) -> AppResult<Vec<ProjectOverview>> {
        Ok(ListingRepo::list(&self.pool, filter).await?)
    }

    pub async fn statistics(&self) -> AppResult<Statistics> {
        Ok(ListingRepo::statistics(&self.pool).await?)
    }

    /// Import spreadsheet rows. Every row is validated before anything is
    /// written; the whole batch lands in one transaction.
    pub async fn import_rows(&self, rows: &[ImportRow], replace: bool) -> AppResult<ImportSummary> {
        if rows.is_empty() && !replace {
            return Err(CoreError::Validation("Import contains no rows".to_string()).into());
        }
        let plans = plan_rows(rows)?;
        let summary = ImportRepo::import(&self.pool, &plans, replace, Utc::now()).await?;

        tracing::info!(
            projects = summary.projects_created,
            reviews = summary.reviews_created,
            replaced = summary.replaced,
            "Import finished"
        );

        Ok(summary)
    }
}
