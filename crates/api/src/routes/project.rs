//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// GET    /{id}                  -> get_by_id
/// GET    /{id}/reviews          -> list_reviews
/// GET    /{id}/consistency      -> consistency
/// POST   /{id}/resync           -> resync
/// POST   /{id}/artwork          -> attach_artwork
/// POST   /{id}/screenshots      -> save_screenshot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{id}", get(project::get_by_id))
        .route("/{id}/reviews", get(project::list_reviews))
        .route("/{id}/consistency", get(project::consistency))
        .route("/{id}/resync", post(project::resync))
        .route("/{id}/artwork", post(project::attach_artwork))
        .route("/{id}/screenshots", post(project::save_screenshot))
}
