//! Weather steward server: configuration and the top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::Router;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;
use steward_api::{AppState, Backend, Upstream, api_router};
use steward_upstream::{DEFAULT_BAIDU_BASE_URL, DEFAULT_WECHAT_BASE_URL, UpstreamConfig};
use tower_http::trace::TraceLayer;

/// Path prefix the API is served under.
pub const API_PREFIX: &str = "/api/weather";

/// Unprefixed credential variables read as fallbacks, as `(key, variable)`.
/// The TOML file and `STEWARD_*` variables take precedence over them.
pub const LEGACY_CREDENTIAL_VARS: [(&str, &str); 3] = [
  ("wechat_app_id", "WECHAT_WEATHER_APPID"),
  ("wechat_secret", "WECHAT_WEATHER_SECRET"),
  ("baidu_ak", "BAIDU_MAP_AK"),
];

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, read from `config.toml` and `STEWARD_*` variables.
///
/// Only the upstream credentials lack defaults. They are optional so the
/// server starts without them; the routes that need them answer 500.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  #[serde(default = "default_store_path")]
  pub store_path:            PathBuf,
  #[serde(default)]
  pub wechat_app_id:         Option<String>,
  #[serde(default)]
  pub wechat_secret:         Option<String>,
  #[serde(default)]
  pub baidu_ak:              Option<String>,
  #[serde(default = "default_wechat_base_url")]
  pub wechat_base_url:       String,
  #[serde(default = "default_baidu_base_url")]
  pub baidu_base_url:        String,
  #[serde(default = "default_upstream_timeout_secs")]
  pub upstream_timeout_secs: u64,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 5000 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/steward/steward.db") }
fn default_wechat_base_url() -> String { DEFAULT_WECHAT_BASE_URL.to_owned() }
fn default_baidu_base_url() -> String { DEFAULT_BAIDU_BASE_URL.to_owned() }
fn default_upstream_timeout_secs() -> u64 { 30 }

impl ServerConfig {
  /// Layer the (optional) TOML file at `path` under the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_builder(
      Config::builder().add_source(File::from(path).required(false)),
      |var| std::env::var(var).ok(),
    )
  }

  fn from_builder(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
  ) -> Result<Self, ConfigError> {
    for (key, var) in LEGACY_CREDENTIAL_VARS {
      if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
        builder = builder.set_default(key, value)?;
      }
    }

    builder
      .add_source(Environment::with_prefix("STEWARD"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn upstream(&self) -> UpstreamConfig {
    UpstreamConfig {
      wechat_app_id:   self.wechat_app_id.clone(),
      wechat_secret:   self.wechat_secret.clone(),
      baidu_ak:        self.baidu_ak.clone(),
      wechat_base_url: self.wechat_base_url.clone(),
      baidu_base_url:  self.baidu_base_url.clone(),
      timeout:         Duration::from_secs(self.upstream_timeout_secs),
    }
  }
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

// ─── Router ──────────────────────────────────────────────────────────────────

/// The full application: the API under [`API_PREFIX`] with request tracing.
pub fn app<S, U>(store: S, upstream: U) -> Router
where
  S: Backend,
  U: Upstream,
{
  let state = AppState::new(Arc::new(store), Arc::new(upstream));
  Router::new()
    .nest(API_PREFIX, api_router(state))
    .layer(TraceLayer::new_for_http())
}
