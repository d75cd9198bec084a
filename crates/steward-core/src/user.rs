//! Per-user location records and the partial-update structure used to edit
//! them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─── UserLocation ────────────────────────────────────────────────────────────

/// A user's last known administrative location.
///
/// Created with every location field `NULL` the first time an unrecognised
/// identifier is seen. `user_id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLocation {
  /// Opaque identifier handed out by the identity provider.
  pub user_id:      String,
  pub nickname:     Option<String>,
  pub avatar_url:   Option<String>,
  pub phone_number: Option<String>,
  pub country:      Option<String>,
  pub province:     Option<String>,
  pub city:         Option<String>,
  /// Expected to match a region catalog `district_geocode`; not enforced.
  pub district:     Option<String>,
  pub latitude:     Option<Decimal>,
  pub longitude:    Option<Decimal>,
  pub created_at:   DateTime<Utc>,
  /// Refreshed by every mutation.
  pub updated_at:   DateTime<Utc>,
}

impl UserLocation {
  pub fn location(&self) -> StoredLocation {
    StoredLocation {
      country:  self.country.clone(),
      province: self.province.clone(),
      city:     self.city.clone(),
      district: self.district.clone(),
    }
  }
}

// ─── StoredLocation ──────────────────────────────────────────────────────────

/// The four administrative fields of a [`UserLocation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLocation {
  pub country:  Option<String>,
  pub province: Option<String>,
  pub city:     Option<String>,
  pub district: Option<String>,
}

/// A latitude/longitude pair as received from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
  pub latitude:  Decimal,
  pub longitude: Decimal,
}

// ─── LocationUpdate ──────────────────────────────────────────────────────────

/// A column of `user_info` that a [`LocationUpdate`] may assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationColumn {
  Country,
  Province,
  City,
  District,
}

impl LocationColumn {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Country => "country",
      Self::Province => "province",
      Self::City => "city",
      Self::District => "district",
    }
  }
}

/// A partial edit of a user's location. Only the fields that are `Some` are
/// written; the rest are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationUpdate {
  pub country:  Option<String>,
  pub province: Option<String>,
  pub city:     Option<String>,
  pub district: Option<String>,
}

impl LocationUpdate {
  pub fn builder() -> LocationUpdateBuilder { LocationUpdateBuilder::default() }

  pub fn is_empty(&self) -> bool { self.assignments().is_empty() }

  /// One `(column, value)` pair per present field, in column order.
  pub fn assignments(&self) -> Vec<(LocationColumn, &str)> {
    [
      (LocationColumn::Country, &self.country),
      (LocationColumn::Province, &self.province),
      (LocationColumn::City, &self.city),
      (LocationColumn::District, &self.district),
    ]
    .into_iter()
    .filter_map(|(col, value)| value.as_deref().map(|v| (col, v)))
    .collect()
  }
}

/// Builder for [`LocationUpdate`].
#[derive(Debug, Clone, Default)]
pub struct LocationUpdateBuilder {
  inner: LocationUpdate,
}

impl LocationUpdateBuilder {
  pub fn country(mut self, value: impl Into<String>) -> Self {
    self.inner.country = Some(value.into());
    self
  }

  pub fn province(mut self, value: impl Into<String>) -> Self {
    self.inner.province = Some(value.into());
    self
  }

  pub fn city(mut self, value: impl Into<String>) -> Self {
    self.inner.city = Some(value.into());
    self
  }

  pub fn district(mut self, value: impl Into<String>) -> Self {
    self.inner.district = Some(value.into());
    self
  }

  pub fn build(self) -> LocationUpdate { self.inner }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_update_has_no_assignments() {
    let update = LocationUpdate::builder().build();
    assert!(update.is_empty());
    assert!(update.assignments().is_empty());
  }

  #[test]
  fn assignments_cover_only_present_fields() {
    let update = LocationUpdate::builder()
      .district("110105")
      .country("0")
      .build();

    assert!(!update.is_empty());
    assert_eq!(
      update.assignments(),
      vec![(LocationColumn::Country, "0"), (LocationColumn::District, "110105")]
    );
  }

  #[test]
  fn deserialised_nulls_are_absent() {
    let update: LocationUpdate =
      serde_json::from_str(r#"{"city":"110100","province":null}"#).unwrap();
    assert_eq!(update.assignments(), vec![(LocationColumn::City, "110100")]);
  }
}
