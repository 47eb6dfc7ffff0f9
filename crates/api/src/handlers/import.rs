//! Bulk import of spreadsheet rows.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use vidreview_db::models::import::{ImportRequest, ImportSummary};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/import
///
/// Rows are keyed by the spreadsheet's column headers. Any invalid row
/// rejects the whole batch before anything is written.
pub async fn import(
    State(state): State<AppState>,
    Json(input): Json<ImportRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ImportSummary>>)> {
    let summary = state.engine.import_rows(&input.rows, input.replace).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}
