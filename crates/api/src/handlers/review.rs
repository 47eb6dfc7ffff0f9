//! Handlers for review submission.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use vidreview_db::models::review::{ReviewSubmission, SubmitReview};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/reviews
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitReview>,
) -> AppResult<(StatusCode, Json<DataResponse<ReviewSubmission>>)> {
    let submission = state.engine.submit_review(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: submission })))
}
