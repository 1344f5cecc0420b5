//! PostgreSQL backend.

use super::{LogStore, Page, sql};
use crate::{
    config::DatabaseConfig,
    error::{Error, Result},
    models::{
        log::{log_entry::LogEntry, log_row::LogRow, new_log_entry::NewLogEntry},
        response::log_stats::LogStats,
    },
};
use async_trait::async_trait;
use sqlx::{
    Connection, PgConnection, PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
    types::Json,
};
use std::str::FromStr;

pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
    /// Connect using the discrete host/port/user/password/name settings.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .username(&cfg.user)
            .password(&cfg.password)
            .database(&cfg.name);
        Self::connect_options(options, cfg.max_connections).await
    }

    pub async fn connect_url(db_url: &str, max_connections: u32) -> Result<Self> {
        let options = PgConnectOptions::from_str(db_url).map_err(Error::Connection)?;
        Self::connect_options(options, max_connections).await
    }

    pub async fn connect_options(options: PgConnectOptions, max_connections: u32) -> Result<Self> {
        // The pool retries refused connections until its acquire timeout and
        // then reports only `PoolTimedOut`; a direct connect keeps the cause.
        PgConnection::connect_with(&options)
            .await
            .map_err(Error::Connection)?
            .close()
            .await
            .map_err(Error::Connection)?;

        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(Error::Connection)?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS logs (
                id BIGSERIAL PRIMARY KEY,
                level TEXT NOT NULL DEFAULT 'info',
                message TEXT NOT NULL DEFAULT '',
                service TEXT NOT NULL DEFAULT 'unknown',
                data JSONB NOT NULL DEFAULT '{}'::jsonb,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
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
        // One snapshot so the counts and the newest row agree.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

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
