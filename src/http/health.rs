//! Service health probe.

use crate::{app::AppState, models::response::health::HealthResponse};
use axum::{Json, extract::State};
use chrono::Utc;
use tracing::warn;

/// Always answers 200; an unreachable database degrades the reported status.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
  let (status, database) = match state.store.ping().await {
    Ok(()) => ("healthy", "connected"),
    Err(e) => {
      warn!("health check: {e}");
      ("unhealthy", "disconnected")
    }
  };
  Json(HealthResponse {
    status,
    database,
    timestamp: Utc::now(),
  })
}
