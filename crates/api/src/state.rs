use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::WorkflowEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vidreview_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Transition engine; every write goes through it.
    pub engine: WorkflowEngine,
}
