//! Handlers for the `/projects` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use vidreview_core::derivation::StageConsistency;
use vidreview_core::types::DbId;
use vidreview_db::models::listing::ProjectOverview;
use vidreview_db::models::project::{ArtworkAttachment, CreateProject};
use vidreview_db::models::review::ReviewRecord;
use vidreview_db::models::screenshot::{SaveScreenshot, Screenshot};
use vidreview_db::models::workflow::WorkflowStatus;

use crate::error::{AppError, AppResult};
use crate::query::ProjectListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field names accepted for the artwork file.
const ARTWORK_FILE_FIELDS: &[&str] = &["videoFile", "file"];

/// Multipart text field carrying an already-hosted artwork URL.
const ARTWORK_URL_FIELD: &str = "video_url";

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<DataResponse<Vec<ProjectOverview>>>> {
    let filter = params.into_filter()?;
    let projects = state.engine.list_projects(&filter).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectOverview>>)> {
    let project = state.engine.create_project(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectOverview>>> {
    let project = state.engine.get_project(&id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// GET /api/v1/projects/{id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ReviewRecord>>>> {
    let reviews = state.engine.list_reviews(&id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// GET /api/v1/projects/{id}/consistency
pub async fn consistency(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StageConsistency>>> {
    let report = state.engine.check_consistency(&id).await?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/projects/{id}/resync
pub async fn resync(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkflowStatus>>> {
    let workflow = state.engine.resync(&id).await?;
    Ok(Json(DataResponse { data: workflow }))
}

/// POST /api/v1/projects/{id}/artwork
///
/// Multipart body with either a video file (`videoFile` or `file`) or a
/// `video_url` text field pointing at an already-hosted video.
pub async fn attach_artwork(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ArtworkAttachment>>> {
    let mut video_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if ARTWORK_FILE_FIELDS.contains(&name.as_str()) {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::BadRequest("Artwork file has no file name".into()))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;

            let attachment = state
                .engine
                .upload_artwork_video(&id, &file_name, &data)
                .await?;
            return Ok(Json(DataResponse { data: attachment }));
        }

        if name == ARTWORK_URL_FIELD {
            video_url = Some(
                field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            );
        }
    }

    let video_url = video_url.ok_or_else(|| {
        AppError::BadRequest("Expected a 'videoFile' upload or a 'video_url' field".into())
    })?;
    let attachment = state.engine.attach_artwork_video(&id, &video_url).await?;
    Ok(Json(DataResponse { data: attachment }))
}

/// POST /api/v1/projects/{id}/screenshots
pub async fn save_screenshot(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SaveScreenshot>,
) -> AppResult<(StatusCode, Json<DataResponse<Screenshot>>)> {
    let screenshot = state.engine.save_screenshot(&id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: screenshot })))
}
