//! Aggregated counts API.

use crate::{app::AppState, error::Result, models::response::log_stats::LogStats};
use axum::{Json, extract::State};

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<LogStats>> {
  Ok(Json(state.store.stats().await?))
}
