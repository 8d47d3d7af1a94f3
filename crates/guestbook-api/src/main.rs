//! guestbook server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layers
//! `GUESTBOOK_*` environment variables on top, opens the SQLite store, and
//! serves the greeting API over HTTP.

use std::{
  net::SocketAddr,
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use guestbook_api::{AppState, ServerConfig};
use guestbook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Wedding guestbook API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("GUESTBOOK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg),
  };

  let app = guestbook_api::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .with_graceful_shutdown(shutdown_signal())
  .await
  .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutdown requested");
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
