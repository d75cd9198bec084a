//! HTTP clients for the third-party services behind login, coordinate
//! resolution and the forecast passthrough.
//!
//! [`UpstreamClient`] implements every collaborator trait from
//! [`steward_core::upstream`] over one shared [`reqwest::Client`].

mod baidu;
mod wechat;

use std::{sync::Arc, time::Duration};

use reqwest::Client;
use serde::de::DeserializeOwned;
use steward_core::{Error, Result};

pub const DEFAULT_WECHAT_BASE_URL: &str = "https://api.weixin.qq.com";
pub const DEFAULT_BAIDU_BASE_URL: &str = "https://api.map.baidu.com";

/// Credentials and endpoints for the upstream services.
///
/// Credentials are optional: a missing one only fails the call that needs it,
/// with [`Error::Configuration`].
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
  pub wechat_app_id:   Option<String>,
  pub wechat_secret:   Option<String>,
  /// Baidu Map access key, shared by geocoding and weather.
  pub baidu_ak:        Option<String>,
  pub wechat_base_url: String,
  pub baidu_base_url:  String,
  pub timeout:         Duration,
}

impl Default for UpstreamConfig {
  fn default() -> Self {
    Self {
      wechat_app_id:   None,
      wechat_secret:   None,
      baidu_ak:        None,
      wechat_base_url: DEFAULT_WECHAT_BASE_URL.to_owned(),
      baidu_base_url:  DEFAULT_BAIDU_BASE_URL.to_owned(),
      timeout:         Duration::from_secs(30),
    }
  }
}

/// Async client for WeChat and Baidu Map.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct UpstreamClient {
  client: Client,
  config: Arc<UpstreamConfig>,
}

impl UpstreamClient {
  pub fn new(config: UpstreamConfig) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config: Arc::new(config) })
  }

  fn url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
  }

  fn baidu_ak(&self) -> Result<&str> {
    self
      .config
      .baidu_ak
      .as_deref()
      .filter(|ak| !ak.is_empty())
      .ok_or_else(|| Error::Configuration("Baidu Map AK".into()))
  }

  /// `GET url?query`, decoding the body as JSON whatever its content type.
  async fn get_json<T: DeserializeOwned>(
    &self,
    service: &str,
    url: &str,
    query: &[(&str, &str)],
  ) -> Result<T> {
    tracing::debug!(service, url, "upstream request");

    let resp = self
      .client
      .get(url)
      .query(query)
      .send()
      .await
      .map_err(|e| Error::upstream(service, e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
      tracing::warn!(service, %status, "upstream returned HTTP error");
      return Err(Error::upstream(service, format!("HTTP {status}")));
    }

    let body = resp
      .text()
      .await
      .map_err(|e| Error::upstream(service, e.to_string()))?;
    serde_json::from_str(&body)
      .map_err(|e| Error::upstream(service, format!("undecodable response: {e}")))
  }
}
