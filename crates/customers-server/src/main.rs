//! customers-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite customer store, and serves the JSON API over HTTP.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use customers_core::service::CustomerService;
use customers_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Customers API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Serve from an in-memory database instead of `store_path`.
  #[arg(long)]
  in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  let store = if cli.in_memory {
    SqliteStore::open_in_memory()
      .await
      .context("failed to open in-memory store")?
  } else {
    SqliteStore::open(&server_cfg.store_path)
      .await
      .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?
  };

  let app = customers_api::app(Arc::new(CustomerService::new(store)));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("failed to listen for ctrl-c: {e}");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
