//! Paginated listing of log entries.

use crate::models::log::log_entry::LogEntry;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LogPage {
    pub logs: Vec<LogEntry>,
    /// Count of all stored entries, independent of pagination.
    pub total: i64,
    pub returned: usize,
    pub limit: i64,
    pub offset: i64,
}
