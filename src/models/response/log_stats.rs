//! Aggregated counts over every stored entry.

use crate::models::log::{log_entry::LogEntry, log_row::LogRow};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct LogStats {
    pub total_logs: i64,
    pub levels: BTreeMap<String, i64>,
    pub services: BTreeMap<String, i64>,
    pub last_log: Option<LogEntry>,
}

impl LogStats {
    /// Assemble from the raw aggregation query results.
    pub fn from_parts(
        total_logs: i64,
        levels: Vec<(String, i64)>,
        services: Vec<(String, i64)>,
        newest: Option<LogRow>,
    ) -> Self {
        LogStats {
            total_logs,
            levels: levels.into_iter().collect(),
            services: services.into_iter().collect(),
            last_log: newest.map(LogEntry::from),
        }
    }
}
