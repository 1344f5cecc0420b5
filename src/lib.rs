//! logsink library entrypoint.
//!
//! Modules:
//! - `app`: startup and shared state
//! - `config`: environment-driven settings
//! - `db`: log repository trait with PostgreSQL and SQLite backends
//! - `http`: Axum router and handlers
//! - `models`: typed records used across layers
//! - `error`: error type and its HTTP mapping
//! - `util`: tracing setup

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod util;

pub use error::{Error, Result};
