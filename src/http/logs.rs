//! Log ingestion, listing and bulk clear.

use crate::{
  app::AppState,
  db::Page,
  error::{Error, Result},
  models::{
    log::new_log_entry::NewLogEntry,
    response::{
      log_page::LogPage,
      mutation::{ClearedLogs, CreatedLog},
    },
  },
};
use axum::{
  Json,
  body::Bytes,
  extract::{
    Query, State,
    rejection::{BytesRejection, QueryRejection},
  },
  http::StatusCode,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

/// Resolve `limit`/`offset` query values. Missing or non-numeric values take
/// the defaults; negatives clamp to zero.
pub fn compute_page(params: &HashMap<String, String>) -> Page {
  let num = |key: &str| {
    params
      .get(key)
      .and_then(|v| v.trim().parse::<i64>().ok())
  };
  Page::new(
    num("limit").unwrap_or(Page::DEFAULT_LIMIT),
    num("offset").unwrap_or(0),
  )
}

/// Bodies over axum's default 2 MB limit are rejected with 413.
pub async fn create_log(
  State(state): State<AppState>,
  body: std::result::Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<CreatedLog>)> {
  let body = body?;
  let raw: Value =
    serde_json::from_slice(&body).map_err(|e| Error::request_format(e.to_string()))?;
  let entry = NewLogEntry::from_json(&raw);
  let log = state.store.insert(&entry).await?;
  debug!(id = log.id, level = %log.level, service = %log.service, "stored log entry");
  Ok((
    StatusCode::CREATED,
    Json(CreatedLog { success: true, log }),
  ))
}

pub async fn list_logs(
  State(state): State<AppState>,
  query: std::result::Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<LogPage>> {
  let Query(params) = query?;
  let page = compute_page(&params);
  let (logs, total) = state.store.list(page).await?;
  Ok(Json(LogPage {
    returned: logs.len(),
    logs,
    total,
    limit: page.limit,
    offset: page.offset,
  }))
}

pub async fn clear_logs(State(state): State<AppState>) -> Result<Json<ClearedLogs>> {
  let deleted = state.store.clear().await?;
  info!("cleared {deleted} log entries");
  Ok(Json(ClearedLogs {
    success: true,
    deleted,
  }))
}
