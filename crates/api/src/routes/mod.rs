pub mod health;
pub mod project;
pub mod review;
pub mod workflow;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                          list (filters), create
/// /projects/{id}                     get
/// /projects/{id}/reviews             review log
/// /projects/{id}/consistency         cached vs derived stage
/// /projects/{id}/resync              write derived stage back (POST)
/// /projects/{id}/artwork             attach artwork video (multipart POST)
/// /projects/{id}/screenshots         save screenshot (POST)
///
/// /workflow/{id}                     administrative update (PUT)
///
/// /reviews                           submit review (POST)
///
/// /statistics                        aggregate counts
///
/// /import                            bulk import (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/workflow", workflow::router())
        .nest("/reviews", review::router())
        .route("/statistics", get(handlers::statistics::get))
        .route("/import", post(handlers::import::import))
}
