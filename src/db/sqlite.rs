//! SQLite backend, used for local runs and the test suite.

use super::{LogStore, Page, is_sqlite_memory, sql};
use crate::{
    error::{Error, Result},
    models::{
        log::{log_entry::LogEntry, log_row::LogRow, new_log_entry::NewLogEntry},
        response::log_stats::LogStats,
    },
};
use async_trait::async_trait;
use sqlx::{
    Connection, SqliteConnection, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    types::Json,
};
use std::str::FromStr;

pub struct SqliteLogStore {
    pool: SqlitePool,
}

impl SqliteLogStore {
    /// Open a pool for `db_url`. In-memory databases live only as long as
    /// their connection, so they get exactly one that never expires.
    pub async fn connect(db_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(db_url)
            .map_err(Error::Connection)?
            .create_if_missing(true);

        // The pool retries failed opens until its acquire timeout and then
        // reports only the timeout; a direct open keeps the real cause.
        SqliteConnection::connect_with(&options)
            .await
            .map_err(Error::Connection)?
            .close()
            .await
            .map_err(Error::Connection)?;

        let pool_options = if is_sqlite_memory(db_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(Error::Connection)?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl LogStore for SqliteLogStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                level TEXT NOT NULL DEFAULT 'info',
                message TEXT NOT NULL DEFAULT '',
                service TEXT NOT NULL DEFAULT 'unknown',
                data TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(sql::CREATE_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query(sql::PING).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, entry: &NewLogEntry) -> Result<LogEntry> {
        let row = sqlx::query_as::<_, LogRow>(sql::INSERT)
            .bind(&entry.level)
            .bind(&entry.message)
            .bind(&entry.service)
            .bind(Json(&entry.data))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn list(&self, page: Page) -> Result<(Vec<LogEntry>, i64)> {
        let total: i64 = sqlx::query_scalar(sql::COUNT)
            .fetch_one(&self.pool)
            .await?;
        let rows = sqlx::query_as::<_, LogRow>(sql::PAGE)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok((rows.into_iter().map(LogEntry::from).collect(), total))
    }

    async fn clear(&self) -> Result<u64> {
        let done = sqlx::query(sql::CLEAR).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    async fn stats(&self) -> Result<LogStats> {
        // A read transaction keeps the counts and the newest row consistent.
        let mut tx = self.pool.begin().await?;
        let total: i64 = sqlx::query_scalar(sql::COUNT).fetch_one(&mut *tx).await?;
        let levels: Vec<(String, i64)> = sqlx::query_as(sql::LEVEL_COUNTS)
            .fetch_all(&mut *tx)
            .await?;
        let services: Vec<(String, i64)> = sqlx::query_as(sql::SERVICE_COUNTS)
            .fetch_all(&mut *tx)
            .await?;
        let newest = sqlx::query_as::<_, LogRow>(sql::NEWEST)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(LogStats::from_parts(total, levels, services, newest))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
