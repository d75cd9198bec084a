//! Bulk loading of the region catalog.

use std::path::Path;

use steward_core::region::RegionRecord;

use crate::{Result, SqliteStore, encode::encode_decimal};

impl SqliteStore {
  /// Insert or replace `records` in a single transaction. Returns the number
  /// of rows written.
  pub async fn import_regions(&self, records: Vec<RegionRecord>) -> Result<usize> {
    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut written = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO area_info (
               district_id, province, city, city_geocode,
               district, district_geocode, lon, lat
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for r in &records {
            written += stmt.execute(rusqlite::params![
              r.district_id,
              r.province,
              r.city,
              r.city_geocode,
              r.district,
              r.district_geocode,
              encode_decimal(r.lon),
              encode_decimal(r.lat),
            ])?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;

    tracing::info!(rows = written, "region catalog imported");
    Ok(written)
  }

  /// Read a JSON array of [`RegionRecord`]s from `path` and import it.
  pub async fn import_regions_json(&self, path: impl AsRef<Path>) -> Result<usize> {
    let bytes = tokio::fs::read(path).await?;
    let records: Vec<RegionRecord> = serde_json::from_slice(&bytes)?;
    self.import_regions(records).await
  }
}
