//! HTTP router and handlers.

use crate::app::AppState;
use axum::{
    Router,
    routing::{delete, get},
};
use tower_http::trace::TraceLayer;

pub mod health;
pub mod logs;
pub mod stats;

/// Assemble the HTTP router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/logs", get(logs::list_logs).post(logs::create_log))
        .route("/logs/clear", delete(logs::clear_logs))
        .route("/stats", get(stats::get_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
