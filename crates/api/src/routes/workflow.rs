use axum::routing::put;
use axum::Router;

use crate::handlers::workflow;
use crate::state::AppState;

/// Routes mounted at `/workflow`.
///
/// ```text
/// PUT    /{id}                  -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(workflow::update))
}
