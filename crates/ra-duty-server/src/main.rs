//! ra-duty-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, runs startup maintenance, and serves the JSON API over HTTP.
//!
//! # Sample data
//!
//! To start with a demo roster:
//!
//! ```sh
//! RA_DUTY_SEED_SAMPLE_DATA=true cargo run -p ra-duty-server
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use ra_duty_core::store::DutyStore;
use ra_duty_server::{ServerConfig, expand_tilde, seed::seed_sample_data};
use ra_duty_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "RA duty tracker server")]
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
  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if server_cfg.sync_orphans_on_startup {
    let report = store
      .sync_orphans()
      .await
      .context("failed to repair duty/RA references")?;
    if report.is_clean() {
      tracing::debug!("duty/RA references already consistent");
    }
  }

  if server_cfg.seed_sample_data {
    seed_sample_data(&store)
      .await
      .context("failed to seed sample data")?;
  }

  let app = ra_duty_server::router(Arc::new(store), &server_cfg);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
