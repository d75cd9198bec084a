//! [`SqliteStore`], the SQLite implementation of [`RegionCatalog`] and
//! [`UserLocationStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use steward_core::{
  region::{AreaEntry, LocationName, RegionRecord},
  store::{RegionCatalog, StoreBackend, UserLocationStore},
  user::{Coordinates, LocationUpdate, StoredLocation, UserLocation},
};

use crate::{
  Error, Result,
  encode::{REGION_COLUMNS, RawRegion, RawUser, USER_COLUMNS, encode_decimal, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Region catalog and user table backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Select a single user row; `None` if absent.
  fn select_user(
    conn: &rusqlite::Connection,
    user_id: &str,
  ) -> rusqlite::Result<Option<RawUser>> {
    conn
      .query_row(
        &format!("SELECT {USER_COLUMNS} FROM user_info WHERE user_id = ?1"),
        rusqlite::params![user_id],
        RawUser::from_row,
      )
      .optional()
  }

  async fn list_area(&self, sql: &'static str, arg: Option<String>) -> Result<Vec<AreaEntry>> {
    let entries = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let map = |row: &rusqlite::Row<'_>| Ok(AreaEntry { code: row.get(0)?, name: row.get(1)? });
        let rows = match arg {
          Some(a) => stmt.query_map(rusqlite::params![a], map)?.collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt.query_map([], map)?.collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;
    Ok(entries)
  }
}

// ─── RegionCatalog impl ──────────────────────────────────────────────────────

impl StoreBackend for SqliteStore {
  type Error = Error;
}

impl RegionCatalog for SqliteStore {
  async fn find_by_district_geocode(&self, code: String) -> Result<Option<RegionRecord>> {
    let raw: Option<RawRegion> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {REGION_COLUMNS} FROM area_info
                 WHERE district_geocode = ?1
                 ORDER BY district_id
                 LIMIT 1"
              ),
              rusqlite::params![code],
              RawRegion::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRegion::into_region).transpose()
  }

  async fn list_provinces(&self) -> Result<Vec<AreaEntry>> {
    self
      .list_area(
        "SELECT MIN(district_id) AS code, province AS name
         FROM area_info
         GROUP BY province
         ORDER BY code",
        None,
      )
      .await
  }

  async fn list_cities(&self, province: String) -> Result<Vec<AreaEntry>> {
    self
      .list_area(
        "SELECT MIN(city_geocode) AS code, city AS name
         FROM area_info
         WHERE province = ?1
         GROUP BY city
         ORDER BY code",
        Some(province),
      )
      .await
  }

  async fn list_districts(&self, city_geocode: String) -> Result<Vec<AreaEntry>> {
    self
      .list_area(
        "SELECT district_id AS code, district AS name
         FROM area_info
         WHERE city_geocode = ?1
         ORDER BY code",
        Some(city_geocode),
      )
      .await
  }

  async fn find_by_codes(
    &self,
    city_geocode: String,
    district_geocode: String,
  ) -> Result<Option<LocationName>> {
    let name = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT province, city, district FROM area_info
               WHERE city_geocode = ?1 AND district_geocode = ?2
               ORDER BY district_id
               LIMIT 1",
              rusqlite::params![city_geocode, district_geocode],
              |row| {
                Ok(LocationName {
                  province: row.get(0)?,
                  city:     row.get(1)?,
                  district: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(name)
  }
}

// ─── UserLocationStore impl ──────────────────────────────────────────────────

impl UserLocationStore for SqliteStore {
  async fn get_user(&self, user_id: String) -> Result<Option<UserLocation>> {
    let raw = self
      .conn
      .call(move |conn| Ok(Self::select_user(conn, &user_id)?))
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn ensure_user(&self, user_id: String) -> Result<UserLocation> {
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // A concurrent first sighting loses the insert but still reads the
        // winner's row.
        tx.execute(
          "INSERT INTO user_info (user_id, created_at, updated_at)
           VALUES (?1, ?2, ?2)
           ON CONFLICT (user_id) DO NOTHING",
          rusqlite::params![user_id, now],
        )?;
        let raw = Self::select_user(&tx, &user_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_user()
  }

  async fn store_location(
    &self,
    user_id: String,
    location: StoredLocation,
    coordinates: Option<Coordinates>,
  ) -> Result<UserLocation> {
    let now = encode_dt(Utc::now());
    let latitude = coordinates.map(|c| encode_decimal(c.latitude));
    let longitude = coordinates.map(|c| encode_decimal(c.longitude));

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO user_info (
             user_id, country, province, city, district,
             latitude, longitude, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
           ON CONFLICT (user_id) DO UPDATE SET
             country    = excluded.country,
             province   = excluded.province,
             city       = excluded.city,
             district   = excluded.district,
             latitude   = COALESCE(excluded.latitude, user_info.latitude),
             longitude  = COALESCE(excluded.longitude, user_info.longitude),
             updated_at = excluded.updated_at",
          rusqlite::params![
            user_id,
            location.country,
            location.province,
            location.city,
            location.district,
            latitude,
            longitude,
            now,
          ],
        )?;
        let raw = Self::select_user(&tx, &user_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    tracing::debug!(user_id = %raw.user_id, district = ?raw.district, "location stored");
    raw.into_user()
  }

  async fn update_location(
    &self,
    user_id: String,
    update: LocationUpdate,
  ) -> Result<Option<UserLocation>> {
    // Column names come from the closed `LocationColumn` set; only values are
    // bound as parameters.
    let assignments: Vec<(&'static str, String)> = update
      .assignments()
      .into_iter()
      .map(|(col, value)| (col.as_str(), value.to_owned()))
      .collect();
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let mut set_clause: Vec<String> = assignments
          .iter()
          .enumerate()
          .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
          .collect();
        set_clause.push(format!("updated_at = ?{}", assignments.len() + 1));

        let sql = format!(
          "UPDATE user_info SET {} WHERE user_id = ?{}",
          set_clause.join(", "),
          assignments.len() + 2,
        );

        let mut values: Vec<String> = assignments.into_iter().map(|(_, v)| v).collect();
        values.push(now);
        values.push(user_id.clone());

        let tx = conn.transaction()?;
        let changed = tx.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = Self::select_user(&tx, &user_id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}
