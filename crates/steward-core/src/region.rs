//! Region catalog types.
//!
//! The catalog maps administrative-division codes to names and coordinates.
//! It is reference data: loaded once from an external source and never
//! written by request handling.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One district row of the administrative-division table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
  /// Six-character unique key.
  pub district_id:      String,
  pub province:         String,
  pub city:             String,
  pub city_geocode:     String,
  pub district:         String,
  /// Join key against [`crate::user::UserLocation::district`].
  pub district_geocode: String,
  pub lon:              Decimal,
  pub lat:              Decimal,
}

/// A `{code, name}` pair returned by the province/city/district listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaEntry {
  pub code: String,
  pub name: String,
}

impl AreaEntry {
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self { code: code.into(), name: name.into() }
  }
}

/// Human-readable names for a `(city_geocode, district_geocode)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationName {
  pub province: String,
  pub city:     String,
  pub district: String,
}

impl From<RegionRecord> for LocationName {
  fn from(r: RegionRecord) -> Self {
    Self { province: r.province, city: r.city, district: r.district }
  }
}
