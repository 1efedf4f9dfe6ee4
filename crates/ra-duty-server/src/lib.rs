//! HTTP server wiring for the RA duty tracker: configuration, middleware and
//! startup maintenance around [`ra_duty_api::api_router`].

pub mod seed;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use ra_duty_core::store::DutyStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `RA_DUTY_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                    String,
  #[serde(default = "default_port")]
  pub port:                    u16,
  #[serde(default = "default_store_path")]
  pub store_path:              PathBuf,
  /// Repair dangling duty → RA references before serving.
  #[serde(default = "enabled")]
  pub sync_orphans_on_startup: bool,
  /// Populate an empty roster with sample RAs and duties.
  #[serde(default)]
  pub seed_sample_data:        bool,
  /// Allow any origin, so a browser front-end on another port can call the API.
  #[serde(default = "enabled")]
  pub permissive_cors:         bool,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 5001 }

fn default_store_path() -> PathBuf { PathBuf::from("ra_duty_tracker.db") }

fn enabled() -> bool { true }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                    default_host(),
      port:                    default_port(),
      store_path:              default_store_path(),
      sync_orphans_on_startup: enabled(),
      seed_sample_data:        false,
      permissive_cors:         enabled(),
    }
  }
}

impl ServerConfig {
  /// Layer the TOML file at `path` (if present) under `RA_DUTY_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("RA_DUTY"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: the JSON API under `/api`, request tracing,
/// and (if configured) permissive CORS.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: DutyStore + 'static,
{
  let app = Router::new()
    .nest("/api", ra_duty_api::api_router(store))
    .layer(TraceLayer::new_for_http());

  if config.permissive_cors {
    app.layer(CorsLayer::permissive())
  } else {
    app
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
