//! Handler for `GET /weather?district=<code>`.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use serde_json::Value;
use steward_core::resolve;

use crate::{AppState, Backend, Upstream, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
  pub district: Option<String>,
}

/// `GET /weather?district=<code>`
///
/// Returns the upstream `forecasts` member unchanged.
pub async fn handler<S, U>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<WeatherParams>,
) -> Result<Json<Value>, ApiError>
where
  S: Backend,
  U: Upstream,
{
  let district = params.district.unwrap_or_default();
  let forecasts = resolve::weather(state.upstream.as_ref(), &district).await?;
  Ok(Json(forecasts))
}
