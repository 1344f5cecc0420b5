//! Runtime configuration loaded from environment variables.

use crate::error::{Error, Result};
use std::{fmt, net::SocketAddr};

pub const DEFAULT_ADDR: &str = "0.0.0.0:5000";

/// Database connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection URL; overrides the individual fields when set.
    /// `sqlite:` URLs select the SQLite backend.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            name: "logs_db".to_string(),
            user: "logs_user".to_string(),
            password: "logs_password".to_string(),
            max_connections: 5,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database: DatabaseConfig,
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing or empty values take the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = DatabaseConfig::default();

        let database = DatabaseConfig {
            url: get("DB_URL"),
            host: get("DB_HOST").unwrap_or(defaults.host),
            port: parse_or(get("DB_PORT"), "DB_PORT", defaults.port)?,
            name: get("DB_NAME").unwrap_or(defaults.name),
            user: get("DB_USER").unwrap_or(defaults.user),
            password: get("DB_PASSWORD").unwrap_or(defaults.password),
            max_connections: parse_or(
                get("DB_MAX_CONNECTIONS"),
                "DB_MAX_CONNECTIONS",
                defaults.max_connections,
            )?,
        };

        let addr = get("LOGSINK_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()
            .map_err(|e| Error::config(format!("LOGSINK_ADDR: {e}")))?;

        Ok(Config { addr, database })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| Error::config(format!("{key}: {e}"))),
        None => Ok(default),
    }
}
