//! Video project models.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;
use vidreview_core::importer::PlannedProject;
use vidreview_core::project::non_blank;
use vidreview_core::types::{Date, DbId, Timestamp};

use crate::models::workflow::WorkflowStatus;

/// A row from the `video_projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub provide_date: Option<Date>,
    pub selection_date: Option<Date>,
    pub brand_name: Option<String>,
    pub category_level1: Option<String>,
    pub category_level2: Option<String>,
    pub category_level3: Option<String>,
    pub video_url: Option<String>,
    pub product_id: Option<String>,
    pub product_url: Option<String>,
    pub material_name_vip: Option<String>,
    pub material_name_full: Option<String>,
    pub material_price: i64,
    pub selling_points: Json<Vec<String>>,
    pub artwork_video_url: Option<String>,
    pub artwork_uploaded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project through the API.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateProject {
    pub provide_date: Option<Date>,
    pub selection_date: Option<Date>,
    #[validate(length(min = 1, max = 200, message = "brand_name must be 1-200 characters"))]
    pub brand_name: String,
    pub category_level1: Option<String>,
    pub category_level2: Option<String>,
    pub category_level3: Option<String>,
    #[validate(url(message = "video_url must be a valid URL"))]
    pub video_url: Option<String>,
    pub product_id: Option<String>,
    #[validate(url(message = "product_url must be a valid URL"))]
    pub product_url: Option<String>,
    pub material_name_vip: Option<String>,
    pub material_name_full: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "material_price must be non-negative"))]
    pub material_price: i64,
    #[serde(default)]
    pub selling_points: Vec<String>,
}

/// Validated project fields ready to insert, from either creation path.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub provide_date: Option<Date>,
    pub selection_date: Option<Date>,
    pub brand_name: Option<String>,
    pub category_level1: Option<String>,
    pub category_level2: Option<String>,
    pub category_level3: Option<String>,
    pub video_url: Option<String>,
    pub product_id: Option<String>,
    pub product_url: Option<String>,
    pub material_name_vip: Option<String>,
    pub material_name_full: Option<String>,
    pub material_price: i64,
    pub selling_points: Vec<String>,
}

impl From<CreateProject> for NewProject {
    fn from(input: CreateProject) -> Self {
        NewProject {
            provide_date: input.provide_date,
            selection_date: input.selection_date,
            brand_name: non_blank(Some(&input.brand_name)),
            category_level1: non_blank(input.category_level1.as_deref()),
            category_level2: non_blank(input.category_level2.as_deref()),
            category_level3: non_blank(input.category_level3.as_deref()),
            video_url: non_blank(input.video_url.as_deref()),
            product_id: non_blank(input.product_id.as_deref()),
            product_url: non_blank(input.product_url.as_deref()),
            material_name_vip: non_blank(input.material_name_vip.as_deref()),
            material_name_full: non_blank(input.material_name_full.as_deref()),
            material_price: input.material_price,
            selling_points: input
                .selling_points
                .into_iter()
                .map(|p| p.trim().to_string())
                .collect(),
        }
    }
}

impl From<PlannedProject> for NewProject {
    fn from(planned: PlannedProject) -> Self {
        NewProject {
            provide_date: planned.provide_date,
            selection_date: planned.selection_date,
            brand_name: planned.brand_name,
            category_level1: planned.category_level1,
            category_level2: planned.category_level2,
            category_level3: planned.category_level3,
            video_url: planned.video_url,
            product_id: planned.product_id,
            product_url: planned.product_url,
            material_name_vip: planned.material_name_vip,
            material_name_full: planned.material_name_full,
            material_price: planned.material_price,
            selling_points: planned.selling_points,
        }
    }
}

/// Result of attaching an artwork video: the updated project and cache row.
#[derive(Debug, Clone, Serialize)]
pub struct ArtworkAttachment {
    pub project: Project,
    pub workflow: WorkflowStatus,
}
