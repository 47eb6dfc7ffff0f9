//! Handlers for administrative workflow edits.

use axum::extract::{Path, State};
use axum::Json;
use vidreview_core::types::DbId;
use vidreview_db::models::workflow::{UpdateWorkflow, WorkflowStatus};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// PUT /api/v1/workflow/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkflow>,
) -> AppResult<Json<DataResponse<WorkflowStatus>>> {
    let workflow = state.engine.update_workflow(&id, input).await?;
    Ok(Json(DataResponse { data: workflow }))
}
