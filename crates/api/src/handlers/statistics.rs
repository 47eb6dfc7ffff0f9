use axum::extract::State;
use axum::Json;
use vidreview_db::models::listing::Statistics;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/statistics
pub async fn get(State(state): State<AppState>) -> AppResult<Json<DataResponse<Statistics>>> {
    let stats = state.engine.statistics().await?;
    Ok(Json(DataResponse { data: stats }))
}
