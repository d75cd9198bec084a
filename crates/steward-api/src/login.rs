//! Handler for `GET /login?code=<code>`.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use steward_core::resolve::{self, LoginOutcome};

use crate::{AppState, Backend, Upstream, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct LoginParams {
  pub code: Option<String>,
}

/// `GET /login?code=<code>`
///
/// Exchanges the code for a user id and returns that user's stored location,
/// creating the user on first login.
pub async fn handler<S, U>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<LoginParams>,
) -> Result<Json<LoginOutcome>, ApiError>
where
  S: Backend,
  U: Upstream,
{
  let code = params.code.unwrap_or_default();
  let outcome =
    resolve::resolve_or_create(state.store.as_ref(), state.upstream.as_ref(), &code).await?;
  Ok(Json(outcome))
}
