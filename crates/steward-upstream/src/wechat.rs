//! WeChat mini-program login: `jscode2session`.

use serde::Deserialize;
use steward_core::{Error, Result, upstream::IdentityProvider};

use crate::UpstreamClient;

const SERVICE: &str = "WeChat login";

#[derive(Debug, Deserialize)]
struct SessionResponse {
  openid:  Option<String>,
  #[serde(default)]
  errcode: i64,
  errmsg:  Option<String>,
}

impl IdentityProvider for UpstreamClient {
  async fn exchange_code(&self, code: String) -> Result<String> {
    let (app_id, secret) = match (&self.config.wechat_app_id, &self.config.wechat_secret) {
      (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => (id, secret),
      _ => return Err(Error::Configuration("WeChat".into())),
    };

    let url = Self::url(&self.config.wechat_base_url, "/sns/jscode2session");
    let resp: SessionResponse = self
      .get_json(
        SERVICE,
        &url,
        &[
          ("appid", app_id.as_str()),
          ("secret", secret.as_str()),
          ("js_code", code.as_str()),
          ("grant_type", "authorization_code"),
        ],
      )
      .await?;

    if resp.errcode != 0 {
      tracing::warn!(errcode = resp.errcode, "WeChat rejected login code");
      return Err(Error::Auth {
        errcode: resp.errcode,
        errmsg:  resp.errmsg.unwrap_or_default(),
      });
    }

    resp
      .openid
      .filter(|id| !id.is_empty())
      .ok_or_else(|| Error::upstream(SERVICE, "Failed to get openid"))
  }
}
