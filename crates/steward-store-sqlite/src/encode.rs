//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and decimals in their canonical
//! text form, so no precision is lost to floating point.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use steward_core::{region::RegionRecord, user::UserLocation};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Decimal ─────────────────────────────────────────────────────────────────

pub fn encode_decimal(d: Decimal) -> String { d.to_string() }

pub fn decode_decimal(s: &str) -> Result<Decimal> { Ok(Decimal::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawRegion::from_row`].
pub const REGION_COLUMNS: &str =
  "district_id, province, city, city_geocode, district, district_geocode, lon, lat";

/// Raw strings read directly from an `area_info` row.
pub struct RawRegion {
  pub district_id:      String,
  pub province:         String,
  pub city:             String,
  pub city_geocode:     String,
  pub district:         String,
  pub district_geocode: String,
  pub lon:              String,
  pub lat:              String,
}

impl RawRegion {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      district_id:      row.get(0)?,
      province:         row.get(1)?,
      city:             row.get(2)?,
      city_geocode:     row.get(3)?,
      district:         row.get(4)?,
      district_geocode: row.get(5)?,
      lon:              row.get(6)?,
      lat:              row.get(7)?,
    })
  }

  pub fn into_region(self) -> Result<RegionRecord> {
    Ok(RegionRecord {
      lon:              decode_decimal(&self.lon)?,
      lat:              decode_decimal(&self.lat)?,
      district_id:      self.district_id,
      province:         self.province,
      city:             self.city,
      city_geocode:     self.city_geocode,
      district:         self.district,
      district_geocode: self.district_geocode,
    })
  }
}

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "user_id, nickname, avatar_url, phone_number, \
  country, province, city, district, latitude, longitude, created_at, updated_at";

/// Raw strings read directly from a `user_info` row.
pub struct RawUser {
  pub user_id:      String,
  pub nickname:     Option<String>,
  pub avatar_url:   Option<String>,
  pub phone_number: Option<String>,
  pub country:      Option<String>,
  pub province:     Option<String>,
  pub city:         Option<String>,
  pub district:     Option<String>,
  pub latitude:     Option<String>,
  pub longitude:    Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:      row.get(0)?,
      nickname:     row.get(1)?,
      avatar_url:   row.get(2)?,
      phone_number: row.get(3)?,
      country:      row.get(4)?,
      province:     row.get(5)?,
      city:         row.get(6)?,
      district:     row.get(7)?,
      latitude:     row.get(8)?,
      longitude:    row.get(9)?,
      created_at:   row.get(10)?,
      updated_at:   row.get(11)?,
    })
  }

  pub fn into_user(self) -> Result<UserLocation> {
    let latitude = self.latitude.as_deref().map(decode_decimal).transpose()?;
    let longitude = self.longitude.as_deref().map(decode_decimal).transpose()?;

    Ok(UserLocation {
      user_id: self.user_id,
      nickname: self.nickname,
      avatar_url: self.avatar_url,
      phone_number: self.phone_number,
      country: self.country,
      province: self.province,
      city: self.city,
      district: self.district,
      latitude,
      longitude,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
