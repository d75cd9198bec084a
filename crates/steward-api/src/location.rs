//! Handlers for `/location`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/location?user_id=&lat=&lng=` | Resolve coordinates and store them |
//! | `POST` | `/location` | Body: `{"user_id":..., "city":..., ...}` |

use axum::{
  Json,
  body::Bytes,
  extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use steward_core::{
  resolve,
  user::{Coordinates, LocationUpdate, StoredLocation},
};

use crate::{AppState, Backend, Upstream, error::ApiError};

// ─── Resolve ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
  pub user_id: Option<String>,
  pub lat:     Option<String>,
  pub lng:     Option<String>,
}

fn parse_coordinates(lat: Option<&str>, lng: Option<&str>) -> Result<Coordinates, ApiError> {
  let (Some(lat), Some(lng)) = (
    lat.map(str::trim).filter(|s| !s.is_empty()),
    lng.map(str::trim).filter(|s| !s.is_empty()),
  ) else {
    return Err(ApiError::BadRequest("Missing lat or lng parameter".into()));
  };

  let parse = |s: &str| s.parse::<Decimal>().ok();
  match (parse(lat), parse(lng)) {
    (Some(latitude), Some(longitude)) => Ok(Coordinates { latitude, longitude }),
    _ => Err(ApiError::BadRequest("Invalid lat or lng parameter".into())),
  }
}

/// `GET /location?user_id=<id>&lat=<lat>&lng=<lng>`
pub async fn resolve<S, U>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<ResolveParams>,
) -> Result<Json<StoredLocation>, ApiError>
where
  S: Backend,
  U: Upstream,
{
  let coordinates = parse_coordinates(params.lat.as_deref(), params.lng.as_deref())?;
  let user_id = params.user_id.unwrap_or_default();

  let location = resolve::resolve_location(
    state.store.as_ref(),
    state.upstream.as_ref(),
    &user_id,
    coordinates,
  )
  .await?;
  Ok(Json(location))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub user_id:  Option<String>,
  pub country:  Option<String>,
  pub province: Option<String>,
  pub city:     Option<String>,
  pub district: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
  pub message:        &'static str,
  pub user_id:        String,
  pub updated_fields: LocationUpdate,
}

/// `POST /location`
///
/// The body is parsed by hand so that a missing or malformed body gets the
/// same JSON error shape as every other validation failure.
pub async fn update<S, U>(
  State(state): State<AppState<S, U>>,
  body: Bytes,
) -> Result<Json<UpdateResponse>, ApiError>
where
  S: Backend,
  U: Upstream,
{
  if body.iter().all(u8::is_ascii_whitespace) {
    return Err(ApiError::BadRequest("Missing request body".into()));
  }
  let body: UpdateBody = serde_json::from_slice(&body)
    .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))?;

  let user_id = body.user_id.unwrap_or_default();
  let update = LocationUpdate {
    country:  body.country,
    province: body.province,
    city:     body.city,
    district: body.district,
  };

  let user = resolve::update_fields(state.store.as_ref(), &user_id, update.clone()).await?;
  Ok(Json(UpdateResponse {
    message:        "Location updated successfully",
    user_id:        user.user_id,
    updated_fields: update,
  }))
}
