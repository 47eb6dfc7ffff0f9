//! Transactional bulk import of planned rows.

use sqlx::SqlitePool;
use vidreview_core::importer::ImportPlan;
use vidreview_core::types::Timestamp;

use crate::models::import::ImportSummary;
use crate::models::project::NewProject;
use crate::models::review::NewReview;
use crate::models::workflow::NewWorkflow;
use crate::repositories::project_repo::ProjectRepo;
use crate::repositories::review_repo::ReviewRepo;
use crate::repositories::workflow_repo::WorkflowRepo;

/// Tables cleared by a replacing import, children first.
const REPLACED_TABLES: &[&str] = &[
    "screenshots",
    "review_records",
    "workflow_status",
    "video_projects",
];

/// Writes importer plans to the store.
pub struct ImportRepo;

impl ImportRepo {
    /// Write every plan in one transaction; either all rows land or none do.
    ///
    /// Review records of one row share `now` as their review time and are
    /// ordered by insertion: annotation before UED.
    pub async fn import(
        pool: &SqlitePool,
        plans: &[ImportPlan],
        replace: bool,
        now: Timestamp,
    ) -> Result<ImportSummary, sqlx::Error> {
        let mut tx = crate::begin_write(pool).await?;

        if replace {
            for table in REPLACED_TABLES {
                sqlx::query(&format!("DELETE FROM {table}"))
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let mut summary = ImportSummary {
            replaced: replace,
            ..Default::default()
        };
        let mut seq = ReviewRepo::next_seq(&mut *tx).await?;

        for plan in plans {
            let project =
                ProjectRepo::insert(&mut *tx, &NewProject::from(plan.project.clone()), now).await?;

            let workflow = NewWorkflow {
                current_stage: plan.stage,
                completion_status: plan.completion_status,
                annotation_reviewer: plan.annotation_reviewer.clone(),
                artwork_person: plan.artwork_person.clone(),
            };
            WorkflowRepo::insert(&mut *tx, &project.id, &workflow, now).await?;

            for review in &plan.reviews {
                let record = NewReview {
                    project_id: project.id.clone(),
                    review_type: review.review_type,
                    reviewer_name: review.reviewer_name.clone(),
                    review_status: review.review_status,
                    problem_description: review.problem_description.clone(),
                    screenshot_path: None,
                    review_time: now,
                };
                ReviewRepo::insert(&mut *tx, &record, seq).await?;
                seq += 1;
                summary.reviews_created += 1;
            }
            summary.projects_created += 1;
        }

        tx.commit().await?;
        Ok(summary)
    }
}
