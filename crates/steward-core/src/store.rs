//! Storage traits for the region catalog and the user location table.
//!
//! Implemented by storage backends (e.g. `steward-store-sqlite`). The HTTP
//! layer and the operations in [`crate::resolve`] depend on these
//! abstractions, not on any concrete backend.

use std::future::Future;

use crate::{
  region::{AreaEntry, LocationName, RegionRecord},
  user::{Coordinates, LocationUpdate, StoredLocation, UserLocation},
};

/// Shared error type of a backend that implements both store traits.
pub trait StoreBackend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

// ─── Region catalog ──────────────────────────────────────────────────────────

/// Read-only view of the administrative-division table.
///
/// Every method is a pure read. Listings are ordered by code so identical
/// data always produces identical output.
pub trait RegionCatalog: StoreBackend {
  /// Look up a district row by its `district_geocode`.
  fn find_by_district_geocode(
    &self,
    code: String,
  ) -> impl Future<Output = Result<Option<RegionRecord>, Self::Error>> + Send + '_;

  /// One entry per distinct province; the code is the smallest
  /// `district_id` sharing that province.
  fn list_provinces(
    &self,
  ) -> impl Future<Output = Result<Vec<AreaEntry>, Self::Error>> + Send + '_;

  /// One entry per distinct city whose rows carry `province`.
  fn list_cities(
    &self,
    province: String,
  ) -> impl Future<Output = Result<Vec<AreaEntry>, Self::Error>> + Send + '_;

  /// Every district under `city_geocode`.
  fn list_districts(
    &self,
    city_geocode: String,
  ) -> impl Future<Output = Result<Vec<AreaEntry>, Self::Error>> + Send + '_;

  /// Names for the row matching both geocodes, if any.
  fn find_by_codes(
    &self,
    city_geocode: String,
    district_geocode: String,
  ) -> impl Future<Output = Result<Option<LocationName>, Self::Error>> + Send + '_;
}

// ─── User locations ──────────────────────────────────────────────────────────

/// Per-user location records.
pub trait UserLocationStore: StoreBackend {
  /// Retrieve a user by identifier. Returns `None` if not found.
  fn get_user(
    &self,
    user_id: String,
  ) -> impl Future<Output = Result<Option<UserLocation>, Self::Error>> + Send + '_;

  /// Create the user with all location fields null unless it already exists,
  /// then return the stored row.
  ///
  /// Must be atomic: two concurrent first sightings of the same identifier
  /// yield exactly one row and neither call fails.
  fn ensure_user(
    &self,
    user_id: String,
  ) -> impl Future<Output = Result<UserLocation, Self::Error>> + Send + '_;

  /// Overwrite the four location fields (and the coordinates, when given),
  /// creating the user first if needed.
  fn store_location(
    &self,
    user_id: String,
    location: StoredLocation,
    coordinates: Option<Coordinates>,
  ) -> impl Future<Output = Result<UserLocation, Self::Error>> + Send + '_;

  /// Apply the present fields of `update`. Returns `None`, without creating
  /// anything, when no user matches.
  fn update_location(
    &self,
    user_id: String,
    update: LocationUpdate,
  ) -> impl Future<Output = Result<Option<UserLocation>, Self::Error>> + Send + '_;
}
