//! API representation of a stored log entry.

use super::log_row::LogRow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub level: String,
    pub message: String,
    pub service: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

impl From<LogRow> for LogEntry {
    fn from(r: LogRow) -> Self {
        LogEntry {
            id: r.id,
            level: r.level,
            message: r.message,
            service: r.service,
            data: r.data.0,
            created_at: r.created_at,
        }
    }
}
