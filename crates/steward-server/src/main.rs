//! Weather steward server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `STEWARD_*`
//! environment variables, opens the SQLite store and serves the JSON API.
//!
//! # Loading the region catalog
//!
//! ```
//! cargo run -p steward-server --bin server -- --import-regions regions.json
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use steward_server::{ServerConfig, expand_tilde};
use steward_store_sqlite::SqliteStore;
use steward_upstream::UpstreamClient;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Weather steward server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load region rows from a JSON array into the catalog and exit.
  #[arg(long, value_name = "PATH")]
  import_regions: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // `.env` first so it can set RUST_LOG as well.
  let dotenv = dotenvy::dotenv();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  if let Ok(path) = dotenv {
    tracing::debug!(path = %path.display(), "loaded .env");
  }

  let cli = Cli::parse();

  let server_cfg =
    ServerConfig::load(&cli.config).context("failed to read configuration")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: load the catalog and exit.
  if let Some(path) = cli.import_regions {
    let rows = store
      .import_regions_json(&path)
      .await
      .with_context(|| format!("failed to import regions from {path:?}"))?;
    tracing::info!(rows, "region catalog imported");
    return Ok(());
  }

  if server_cfg.wechat_app_id.is_none() || server_cfg.wechat_secret.is_none() {
    tracing::warn!("WeChat credentials not configured; /login will fail");
  }
  if server_cfg.baidu_ak.is_none() {
    tracing::warn!("Baidu Map AK not configured; /location and /weather will fail");
  }

  let upstream = UpstreamClient::new(server_cfg.upstream())
    .context("failed to build HTTP client")?;

  let app = steward_server::app(store, upstream);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}{}", steward_server::API_PREFIX);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
