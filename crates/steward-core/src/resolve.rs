//! The operations behind the HTTP surface: login resolution, coordinate
//! resolution, manual location edits and the catalog/forecast lookups that
//! need validation before they reach a backend.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  region::LocationName,
  store::{RegionCatalog, UserLocationStore},
  upstream::{
    ForecastProvider, IdentityProvider, ReverseGeocoder, SUPPORTED_COUNTRY,
    SUPPORTED_COUNTRY_CODE,
  },
  user::{Coordinates, LocationUpdate, StoredLocation, UserLocation},
};

/// Result of [`resolve_or_create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
  pub user_id:  String,
  #[serde(flatten)]
  pub location: StoredLocation,
}

/// Rejects blank input. The value itself is passed on unchanged.
fn require(value: &str, message: &str) -> Result<String> {
  if value.trim().is_empty() {
    return Err(Error::Validation(message.to_owned()));
  }
  Ok(value.to_owned())
}

// ─── Login ───────────────────────────────────────────────────────────────────

/// Exchange a login code for a user identifier and return that user's stored
/// location, creating the user on first sight.
///
/// Idempotent on the identifier: the first call creates the row with every
/// location field null, later calls only read it.
pub async fn resolve_or_create<S, I>(
  store: &S,
  identity: &I,
  code: &str,
) -> Result<LoginOutcome>
where
  S: UserLocationStore,
  I: IdentityProvider,
{
  let code = require(code, "Missing code parameter")?;
  let user_id = identity.exchange_code(code).await?;

  let user = store.ensure_user(user_id).await.map_err(Error::store)?;
  tracing::debug!(user_id = %user.user_id, "login resolved");

  Ok(LoginOutcome { location: user.location(), user_id: user.user_id })
}

// ─── Coordinate resolution ───────────────────────────────────────────────────

/// Reverse-geocode `coordinates`, match the result against the region
/// catalog and persist it as the user's location.
///
/// Nothing is written unless every check passes. Concurrent resolutions for
/// the same user are not serialised; the last write wins.
pub async fn resolve_location<S, G>(
  store: &S,
  geocoder: &G,
  user_id: &str,
  coordinates: Coordinates,
) -> Result<StoredLocation>
where
  S: RegionCatalog + UserLocationStore,
  G: ReverseGeocoder,
{
  let user_id = require(user_id, "Missing user_id parameter")?;

  let place = geocoder
    .reverse_geocode(coordinates.latitude, coordinates.longitude)
    .await?;

  if place.country_code != SUPPORTED_COUNTRY_CODE {
    tracing::warn!(country_code = place.country_code, "unsupported country");
    return Err(Error::UnsupportedRegion { country_code: place.country_code });
  }

  let adcode = place
    .adcode
    .filter(|a| !a.is_empty())
    .ok_or_else(|| Error::upstream("reverse geocoder", "Failed to get adcode"))?;

  let region = store
    .find_by_district_geocode(adcode.clone())
    .await
    .map_err(Error::store)?
    .ok_or(Error::RegionNotFound(adcode))?;

  // Both province and city receive the city geocode.
  let location = StoredLocation {
    country:  Some(SUPPORTED_COUNTRY.to_owned()),
    province: Some(region.city_geocode.clone()),
    city:     Some(region.city_geocode),
    district: Some(region.district_geocode),
  };

  let user = store
    .store_location(user_id, location, Some(coordinates))
    .await
    .map_err(Error::store)?;

  Ok(user.location())
}

// ─── Manual edits ────────────────────────────────────────────────────────────

/// Apply the present fields of `update` to an existing user.
///
/// An empty update is rejected before the store is consulted, so the result
/// does not depend on whether the user exists.
pub async fn update_fields<S>(
  store: &S,
  user_id: &str,
  update: LocationUpdate,
) -> Result<UserLocation>
where
  S: UserLocationStore,
{
  let user_id = require(user_id, "Missing user_id parameter")?;
  if update.is_empty() {
    return Err(Error::NoFieldsProvided);
  }

  store
    .update_location(user_id.clone(), update)
    .await
    .map_err(Error::store)?
    .ok_or(Error::UserNotFound(user_id))
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

/// Names for a `(city_geocode, district_geocode)` pair.
pub async fn location_name<C>(
  catalog: &C,
  city: &str,
  district: &str,
) -> Result<LocationName>
where
  C: RegionCatalog,
{
  let city = require(city, "Missing city or district parameter")?;
  let district = require(district, "Missing city or district parameter")?;

  catalog
    .find_by_codes(city.clone(), district.clone())
    .await
    .map_err(Error::store)?
    .ok_or(Error::LocationNotFound { city, district })
}

/// Forecast passthrough for a district code.
pub async fn weather<F>(forecasts: &F, district: &str) -> Result<serde_json::Value>
where
  F: ForecastProvider,
{
  let district = require(district, "Missing city or district parameter")?;
  forecasts.forecast(district).await
}
