//! Bodies returned by the write endpoints.

use crate::models::log::log_entry::LogEntry;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreatedLog {
    pub success: bool,
    pub log: LogEntry,
}

#[derive(Debug, Serialize)]
pub struct ClearedLogs {
    pub success: bool,
    pub deleted: u64,
}
