//! Integration tests for the repository layer against a real SQLite database:
//! - Project + workflow creation
//! - Review log append, tie-breaking and stage movement
//! - Artwork attachment
//! - Optimistic workflow updates
//! - Rollback of a review when its workflow write fails

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use vidreview_core::types::Timestamp;
use vidreview_core::workflow::{CompletionStatus, ReviewStatus, ReviewType, Stage};
use vidreview_db::models::project::NewProject;
use vidreview_db::models::review::NewReview;
use vidreview_db::models::workflow::{NewWorkflow, WorkflowChanges};
use vidreview_db::repositories::{ProjectRepo, ReviewRepo, WorkflowRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(brand: &str) -> NewProject {
    NewProject {
        brand_name: Some(brand.to_string()),
        material_price: 199,
        selling_points: vec!["Waterproof".to_string(), "Lightweight".to_string()],
        ..Default::default()
    }
}

async fn create_project(pool: &SqlitePool, brand: &str) -> String {
    let (project, _) = ProjectRepo::create(pool, &new_project(brand), &NewWorkflow::default(), Utc::now())
        .await
        .unwrap();
    project.id
}

fn review(
    project_id: &str,
    review_type: ReviewType,
    status: ReviewStatus,
    at: Timestamp,
) -> NewReview {
    NewReview {
        project_id: project_id.to_string(),
        review_type,
        reviewer_name: "张三".to_string(),
        review_status: status,
        problem_description: None,
        screenshot_path: None,
        review_time: at,
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_writes_initial_workflow(pool: SqlitePool) {
    let (project, workflow) =
        ProjectRepo::create(&pool, &new_project("Acme"), &NewWorkflow::default(), Utc::now())
            .await
            .unwrap();

    assert_eq!(project.brand_name.as_deref(), Some("Acme"));
    assert_eq!(project.material_price, 199);
    assert_eq!(project.selling_points.0, vec!["Waterproof", "Lightweight"]);
    assert!(project.artwork_video_url.is_none());

    assert_eq!(workflow.project_id, project.id);
    assert_eq!(workflow.current_stage, Stage::Production);
    assert_eq!(workflow.completion_status, CompletionStatus::NotUploaded);
    assert_eq!(workflow.version, 0);

    let found = ProjectRepo::find_by_id(&pool, &project.id).await.unwrap();
    assert!(found.is_some());
    assert!(ProjectRepo::exists(&pool, &project.id).await.unwrap());
    assert!(!ProjectRepo::exists(&pool, "missing").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_price_violates_check_constraint(pool: SqlitePool) {
    let input = NewProject {
        material_price: -1,
        ..new_project("Acme")
    };
    let result = ProjectRepo::create(&pool, &input, &NewWorkflow::default(), Utc::now()).await;
    assert!(result.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workflow_status")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "workflow row must roll back with the project");
}

// ---------------------------------------------------------------------------
// Review log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn annotation_review_moves_stage_and_records_reviewer(pool: SqlitePool) {
    let id = create_project(&pool, "Acme").await;

    let submission = ReviewRepo::submit(
        &pool,
        &review(&id, ReviewType::Annotation, ReviewStatus::Pass, Utc::now()),
    )
    .await
    .unwrap()
    .expect("project exists");

    assert_eq!(submission.review.review_type, ReviewType::Annotation);
    assert_eq!(submission.workflow.current_stage, Stage::UedReview);
    assert_eq!(submission.workflow.annotation_reviewer.as_deref(), Some("张三"));
    assert_eq!(submission.workflow.ued_reviewer, None);
    assert_eq!(submission.workflow.version, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failing_ued_review_still_moves_to_artwork(pool: SqlitePool) {
    let id = create_project(&pool, "Acme").await;

    let submission = ReviewRepo::submit(
        &pool,
        &review(&id, ReviewType::Ued, ReviewStatus::Fail, Utc::now()),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(submission.workflow.current_stage, Stage::Artwork);
    assert_eq!(submission.workflow.ued_reviewer.as_deref(), Some("张三"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_for_missing_project_writes_nothing(pool: SqlitePool) {
    let result = ReviewRepo::submit(
        &pool,
        &review("missing", ReviewType::Annotation, ReviewStatus::Pass, Utc::now()),
    )
    .await
    .unwrap();
    assert!(result.is_none());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review_records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn equal_review_times_resolve_by_insertion_order(pool: SqlitePool) {
    let id = create_project(&pool, "Acme").await;
    let at = Utc::now();

    for status in [ReviewStatus::Fail, ReviewStatus::Pass] {
        ReviewRepo::submit(&pool, &review(&id, ReviewType::Annotation, status, at))
            .await
            .unwrap()
            .unwrap();
    }

    let effective = ReviewRepo::effective_status(&pool, &id, ReviewType::Annotation)
        .await
        .unwrap();
    assert_eq!(effective, Some(ReviewStatus::Pass));

    let log = ReviewRepo::list_for_project(&pool, &id).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].review_status, ReviewStatus::Pass);
    assert!(log[0].seq > log[1].seq);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn older_review_appended_later_does_not_win(pool: SqlitePool) {
    let id = create_project(&pool, "Acme").await;
    let now = Utc::now();

    ReviewRepo::submit(&pool, &review(&id, ReviewType::Ued, ReviewStatus::Pass, now))
        .await
        .unwrap()
        .unwrap();
    ReviewRepo::submit(
        &pool,
        &review(&id, ReviewType::Ued, ReviewStatus::Fail, now - Duration::days(2)),
    )
    .await
    .unwrap()
    .unwrap();

    let effective = ReviewRepo::effective_status(&pool, &id, ReviewType::Ued)
        .await
        .unwrap();
    assert_eq!(effective, Some(ReviewStatus::Pass));
    assert_eq!(
        ReviewRepo::effective_status(&pool, &id, ReviewType::Annotation)
            .await
            .unwrap(),
        None
    );
}

// ---------------------------------------------------------------------------
// Artwork
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn attach_artwork_is_idempotent_on_stage(pool: SqlitePool) {
    let id = create_project(&pool, "Acme").await;

    let first = ProjectRepo::attach_artwork(&pool, &id, "/uploads/a.mp4", Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.workflow.current_stage, Stage::UedReview);

    let second = ProjectRepo::attach_artwork(&pool, &id, "/uploads/b.mp4", Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.workflow.current_stage, Stage::UedReview);
    assert_eq!(second.project.artwork_video_url.as_deref(), Some("/uploads/b.mp4"));
    assert!(second.project.artwork_uploaded_at.is_some());
    assert_eq!(second.workflow.version, 2);

    let missing = ProjectRepo::attach_artwork(&pool, "missing", "/uploads/c.mp4", Utc::now())
        .await
        .unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Administrative updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_version_update_is_rejected(pool: SqlitePool) {
    let id = create_project(&pool, "Acme").await;
    let current = WorkflowRepo::find(&pool, &id).await.unwrap().unwrap();

    let changes = WorkflowChanges {
        current_stage: Stage::Artwork,
        completion_status: CompletionStatus::NotUploaded,
        artwork_person: Some("王五".to_string()),
        annotation_reviewer: None,
        ued_reviewer: None,
    };

    let updated = WorkflowRepo::update(&pool, &id, current.version, &changes, Utc::now())
        .await
        .unwrap();
    assert_matches!(updated, Some(ref w) if w.current_stage == Stage::Artwork && w.version == 1);
    assert_eq!(
        updated.unwrap().artwork_person.as_deref(),
        Some("王五")
    );

    let stale = WorkflowRepo::update(&pool, &id, current.version, &changes, Utc::now())
        .await
        .unwrap();
    assert!(stale.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn absent_assignees_keep_stored_values(pool: SqlitePool) {
    let id = create_project(&pool, "Acme").await;
    ReviewRepo::submit(
        &pool,
        &review(&id, ReviewType::Annotation, ReviewStatus::Pass, Utc::now()),
    )
    .await
    .unwrap()
    .unwrap();
    let current = WorkflowRepo::find(&pool, &id).await.unwrap().unwrap();

    let changes = WorkflowChanges {
        current_stage: current.current_stage,
        completion_status: CompletionStatus::NotUploaded,
        artwork_person: None,
        annotation_reviewer: None,
        ued_reviewer: None,
    };
    let updated = WorkflowRepo::update(&pool, &id, current.version, &changes, Utc::now())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.annotation_reviewer.as_deref(), Some("张三"));
    assert!(updated.updated_at >= current.updated_at);
}

// ---------------------------------------------------------------------------
// Atomicity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_workflow_write_rolls_back_the_review(pool: SqlitePool) {
    let id = create_project(&pool, "Acme").await;

    sqlx::raw_sql(
        "CREATE TRIGGER block_workflow_update BEFORE UPDATE ON workflow_status
         BEGIN SELECT RAISE(ABORT, 'workflow writes blocked'); END;
         CREATE TRIGGER block_workflow_insert BEFORE INSERT ON workflow_status
         BEGIN SELECT RAISE(ABORT, 'workflow writes blocked'); END;",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = ReviewRepo::submit(
        &pool,
        &review(&id, ReviewType::Annotation, ReviewStatus::Pass, Utc::now()),
    )
    .await;
    assert!(result.is_err());

    let reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review_records")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(reviews, 0, "review row must roll back with the workflow write");

    let workflow = WorkflowRepo::find(&pool, &id).await.unwrap().unwrap();
    assert_eq!(workflow.current_stage, Stage::Production);
    assert_eq!(workflow.annotation_reviewer, None);
    assert_eq!(workflow.version, 0);
}
