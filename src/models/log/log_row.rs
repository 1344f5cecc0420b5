//! Database row for a log entry.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, types::Json};

#[derive(Debug, FromRow)]
pub struct LogRow {
    pub id: i64,
    pub level: String,
    pub message: String,
    pub service: String,
    pub data: Json<Value>,
    pub created_at: DateTime<Utc>,
}
