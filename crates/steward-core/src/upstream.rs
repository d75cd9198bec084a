//! Traits for the third-party services the backend calls out to.
//!
//! Implementations report failures with the domain variants of
//! [`crate::Error`]: `Upstream`, `Auth` and `Configuration`.

use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Country code the reverse geocoder reports for the only supported country.
pub const SUPPORTED_COUNTRY_CODE: i64 = 0;

/// Value written to `UserLocation::country` for the supported country.
pub const SUPPORTED_COUNTRY: &str = "0";

/// What the reverse geocoder knows about a coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodedPlace {
  pub country_code: i64,
  /// Administrative code; expected to match a `district_geocode`.
  pub adcode:       Option<String>,
}

/// Exchanges a client-side login code for an opaque user identifier.
pub trait IdentityProvider: Send + Sync {
  fn exchange_code(
    &self,
    code: String,
  ) -> impl Future<Output = Result<String>> + Send + '_;
}

/// Resolves coordinates to an administrative code.
pub trait ReverseGeocoder: Send + Sync {
  fn reverse_geocode(
    &self,
    latitude: Decimal,
    longitude: Decimal,
  ) -> impl Future<Output = Result<GeocodedPlace>> + Send + '_;
}

/// Fetches the forecast for a district. The payload is passed through as-is.
pub trait ForecastProvider: Send + Sync {
  fn forecast(
    &self,
    district: String,
  ) -> impl Future<Output = Result<serde_json::Value>> + Send + '_;
}
