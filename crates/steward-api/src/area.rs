//! Handlers for the `/area/*` catalog lookups.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/area/provinces` | |
//! | `GET`  | `/area/cities?province=<name>` | 400 without `province` |
//! | `GET`  | `/area/districts?city_geocode=<code>` | 400 without `city_geocode` |
//! | `GET`  | `/area/location_name?city=<code>&district=<code>` | 404 if no row matches |

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use steward_core::{
  Error,
  region::{AreaEntry, LocationName},
  resolve,
};

use crate::{AppState, Backend, Upstream, error::ApiError};

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
    .ok_or_else(|| ApiError::BadRequest(message.to_owned()))
}

// ─── Listings ────────────────────────────────────────────────────────────────

/// `GET /area/provinces`
pub async fn provinces<S, U>(
  State(state): State<AppState<S, U>>,
) -> Result<Json<Vec<AreaEntry>>, ApiError>
where
  S: Backend,
  U: Upstream,
{
  let provinces = state.store.list_provinces().await.map_err(Error::store)?;
  Ok(Json(provinces))
}

#[derive(Debug, Deserialize)]
pub struct CitiesParams {
  pub province: Option<String>,
}

/// `GET /area/cities?province=<name>`
pub async fn cities<S, U>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<CitiesParams>,
) -> Result<Json<Vec<AreaEntry>>, ApiError>
where
  S: Backend,
  U: Upstream,
{
  let province = required(params.province, "Missing province parameter")?;
  let cities = state.store.list_cities(province).await.map_err(Error::store)?;
  Ok(Json(cities))
}

#[derive(Debug, Deserialize)]
pub struct DistrictsParams {
  pub city_geocode: Option<String>,
}

/// `GET /area/districts?city_geocode=<code>`
pub async fn districts<S, U>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<DistrictsParams>,
) -> Result<Json<Vec<AreaEntry>>, ApiError>
where
  S: Backend,
  U: Upstream,
{
  let city_geocode = required(params.city_geocode, "Missing city_geocode parameter")?;
  let districts = state
    .store
    .list_districts(city_geocode)
    .await
    .map_err(Error::store)?;
  Ok(Json(districts))
}

// ─── Names ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LocationNameParams {
  pub city:     Option<String>,
  pub district: Option<String>,
}

/// `GET /area/location_name?city=<code>&district=<code>`
pub async fn location_name<S, U>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<LocationNameParams>,
) -> Result<Json<LocationName>, ApiError>
where
  S: Backend,
  U: Upstream,
{
  let city = params.city.unwrap_or_default();
  let district = params.district.unwrap_or_default();
  let name = resolve::location_name(state.store.as_ref(), &city, &district).await?;
  Ok(Json(name))
}
