//! Log repository: storage trait, backends and connection setup.

use crate::{
    config::DatabaseConfig,
    error::Result,
    models::{
        log::{log_entry::LogEntry, new_log_entry::NewLogEntry},
        response::log_stats::LogStats,
    },
};
use async_trait::async_trait;
use std::{path::Path, sync::Arc};
use tracing::info;

pub mod postgres;
pub mod sqlite;

pub use postgres::PgLogStore;
pub use sqlite::SqliteLogStore;

/// Statements shared by both backends. sqlx binds `$N` placeholders on
/// PostgreSQL and SQLite alike; only the table DDL differs.
mod sql {
    pub const PING: &str = "SELECT 1";
    pub const CREATE_INDEX: &str =
        "CREATE INDEX IF NOT EXISTS idx_logs_created_at ON logs (created_at DESC)";
    pub const INSERT: &str = "INSERT INTO logs (level, message, service, data) \
        VALUES ($1, $2, $3, $4) \
        RETURNING id, level, message, service, data, created_at";
    pub const COUNT: &str = "SELECT COUNT(*) FROM logs";
    pub const PAGE: &str = "SELECT id, level, message, service, data, created_at FROM logs \
        ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2";
    pub const NEWEST: &str = "SELECT id, level, message, service, data, created_at FROM logs \
        ORDER BY created_at DESC, id DESC LIMIT 1";
    pub const LEVEL_COUNTS: &str = "SELECT level, COUNT(*) FROM logs GROUP BY level";
    pub const SERVICE_COUNTS: &str = "SELECT service, COUNT(*) FROM logs GROUP BY service";
    pub const CLEAR: &str = "DELETE FROM logs";
}

/// Window into the newest-first ordering of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 100;

    /// Negative values clamp to zero.
    pub fn new(limit: i64, offset: i64) -> Self {
        Page {
            limit: limit.max(0),
            offset: offset.max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new(Self::DEFAULT_LIMIT, 0)
    }
}

/// Operations against the `logs` table.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Short backend name for startup logging.
    fn backend(&self) -> &'static str;

    /// Create the table and its index if absent. Existing rows are untouched.
    async fn init_schema(&self) -> Result<()>;

    /// Round-trip a trivial statement to prove the database is reachable.
    async fn ping(&self) -> Result<()>;

    /// Insert one row and return it with its assigned id and timestamp.
    async fn insert(&self, entry: &NewLogEntry) -> Result<LogEntry>;

    /// Entries newest first, plus the count of all rows.
    async fn list(&self, page: Page) -> Result<(Vec<LogEntry>, i64)>;

    /// Delete every row, returning how many were removed.
    async fn clear(&self) -> Result<u64>;

    async fn stats(&self) -> Result<LogStats>;

    /// Close the underlying pool. Later calls fail with a connection error.
    async fn close(&self);
}

/// Open the configured backend. `DB_URL` with a `sqlite:` scheme selects
/// SQLite; anything else is PostgreSQL.
pub async fn connect(cfg: &DatabaseConfig) -> Result<Arc<dyn LogStore>> {
    let store: Arc<dyn LogStore> = match cfg.url.as_deref() {
        Some(url) if url.starts_with("sqlite:") => {
            ensure_sqlite_parent(url)?;
            Arc::new(SqliteLogStore::connect(url, cfg.max_connections).await?)
        }
        Some(url) => Arc::new(PgLogStore::connect_url(url, cfg.max_connections).await?),
        None => Arc::new(PgLogStore::connect(cfg).await?),
    };
    info!("connected to {} database", store.backend());
    Ok(store)
}

/// Connect and make sure the schema exists.
pub async fn open(cfg: &DatabaseConfig) -> Result<Arc<dyn LogStore>> {
    let store = connect(cfg).await?;
    store.init_schema().await?;
    Ok(store)
}

pub(crate) fn is_sqlite_memory(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

/// Create the parent folder of a file-backed SQLite URL.
pub fn ensure_sqlite_parent(db_url: &str) -> std::io::Result<()> {
    if is_sqlite_memory(db_url) {
        return Ok(());
    }
    let path_part = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path_only = match path_part.split_once('?') {
        Some((p, _)) => p,
        None => path_part,
    };
    if path_only.is_empty() {
        return Ok(());
    }
    match Path::new(path_only).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
