//! Application setup and runtime.

use crate::{config::Config, db, db::LogStore, http};
use std::sync::Arc;
use tracing::info;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn LogStore>,
}

impl AppState {
  pub fn new(store: Arc<dyn LogStore>) -> Self {
    Self { store }
  }
}

/// Load configuration, prepare the schema and serve HTTP until shutdown.
pub async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  crate::util::init_tracing();

  let config = Config::from_env()?;
  let store = db::open(&config.database).await?;
  let state = AppState::new(store.clone());

  let app = http::build_router(state);

  info!("logsink listening:  http://{}/", config.addr);
  info!("ingest endpoint:    POST http://{}/logs", config.addr);

  let listener = tokio::net::TcpListener::bind(config.addr).await?;
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  store.close().await;
  info!("server stopped");
  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!("failed to listen for ctrl-c: {e}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!("failed to listen for SIGTERM: {e}");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
  info!("shutdown signal received, draining connections");
}
