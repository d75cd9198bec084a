//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use steward_core::{
  region::{AreaEntry, RegionRecord},
  store::{RegionCatalog, UserLocationStore},
  user::{Coordinates, LocationUpdate, StoredLocation},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn region(
  district_id: &str,
  province: &str,
  city: &str,
  city_geocode: &str,
  district: &str,
) -> RegionRecord {
  RegionRecord {
    district_id:      district_id.into(),
    province:         province.into(),
    city:             city.into(),
    city_geocode:     city_geocode.into(),
    district:         district.into(),
    district_geocode: district_id.into(),
    lon:              "116.407526".parse().unwrap(),
    lat:              "39.904030".parse().unwrap(),
  }
}

/// Two provinces; the first has two cities, one of which has two districts.
async fn seeded() -> SqliteStore {
  let s = store().await;
  let written = s
    .import_regions(vec![
      region("110105", "北京", "北京", "110100", "朝阳"),
      region("110101", "北京", "北京", "110100", "东城"),
      region("130102", "北京", "廊坊", "131000", "广阳"),
      region("310104", "上海", "上海", "310100", "徐汇"),
    ])
    .await
    .unwrap();
  assert_eq!(written, 4);
  s
}

fn city_district(location: &StoredLocation) -> (Option<&str>, Option<&str>) {
  (location.city.as_deref(), location.district.as_deref())
}

// ─── Region catalog ──────────────────────────────────────────────────────────

#[tokio::test]
async fn find_by_district_geocode_hit_and_miss() {
  let s = seeded().await;

  let hit = s.find_by_district_geocode("110105".into()).await.unwrap().unwrap();
  assert_eq!(hit.district, "朝阳");
  assert_eq!(hit.city_geocode, "110100");
  assert_eq!(hit.lat, "39.90403".parse::<Decimal>().unwrap());

  let miss = s.find_by_district_geocode("999999".into()).await.unwrap();
  assert!(miss.is_none());
}

#[tokio::test]
async fn provinces_use_smallest_district_id() {
  let s = seeded().await;
  let provinces = s.list_provinces().await.unwrap();

  assert_eq!(
    provinces,
    vec![AreaEntry::new("110101", "北京"), AreaEntry::new("310104", "上海")]
  );
}

#[tokio::test]
async fn cities_are_distinct_per_province() {
  let s = store().await;
  s.import_regions(vec![
    region("000001", "A", "X", "000010", "x1"),
    region("000002", "A", "X", "000010", "x2"),
    region("000003", "A", "Y", "000020", "y1"),
    region("000004", "B", "Z", "000030", "z1"),
  ])
  .await
  .unwrap();

  let cities = s.list_cities("A".into()).await.unwrap();
  let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, ["X", "Y"]);
  assert_eq!(cities[0].code, "000010");

  assert!(s.list_cities("C".into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn districts_are_listed_by_city_geocode() {
  let s = seeded().await;
  let districts = s.list_districts("110100".into()).await.unwrap();

  assert_eq!(
    districts,
    vec![AreaEntry::new("110101", "东城"), AreaEntry::new("110105", "朝阳")]
  );
}

#[tokio::test]
async fn find_by_codes_requires_both_codes_to_match() {
  let s = seeded().await;

  let name = s
    .find_by_codes("110100".into(), "110105".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!((name.province.as_str(), name.city.as_str(), name.district.as_str()), ("北京", "北京", "朝阳"));

  let miss = s.find_by_codes("310100".into(), "110105".into()).await.unwrap();
  assert!(miss.is_none());
}

#[tokio::test]
async fn reimport_replaces_rows() {
  let s = seeded().await;
  s.import_regions(vec![region("110105", "北京", "北京", "110100", "朝阳区")])
    .await
    .unwrap();

  let hit = s.find_by_district_geocode("110105".into()).await.unwrap().unwrap();
  assert_eq!(hit.district, "朝阳区");
  assert_eq!(s.list_districts("110100".into()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn import_regions_from_json_file() {
  let path = std::env::temp_dir().join(format!("steward-regions-{}.json", std::process::id()));
  let json = serde_json::json!([{
    "district_id": "440305",
    "province": "广东",
    "city": "深圳",
    "city_geocode": "440300",
    "district": "南山",
    "district_geocode": "440305",
    "lon": 113.930476,
    "lat": "22.533013"
  }]);
  tokio::fs::write(&path, json.to_string()).await.unwrap();

  let s = store().await;
  let written = s.import_regions_json(&path).await.unwrap();
  tokio::fs::remove_file(&path).await.ok();

  assert_eq!(written, 1);
  let hit = s.find_by_district_geocode("440305".into()).await.unwrap().unwrap();
  assert_eq!(hit.city, "深圳");
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user("nobody".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn ensure_user_creates_blank_row_once() {
  let s = store().await;

  let first = s.ensure_user("o-abc".into()).await.unwrap();
  assert_eq!(first.user_id, "o-abc");
  assert_eq!(first.location(), StoredLocation::default());
  assert!(first.latitude.is_none());

  let second = s.ensure_user("o-abc".into()).await.unwrap();
  assert_eq!(second.created_at, first.created_at);

  let count: i64 = s
    .conn
    .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM user_info", [], |r| r.get(0))?))
    .await
    .unwrap();
  assert_eq!(count, 1);
}

#[tokio::test]
async fn concurrent_first_sightings_yield_one_row() {
  let s = store().await;
  let (a, b) = tokio::join!(s.ensure_user("o-race".into()), s.ensure_user("o-race".into()));

  assert_eq!(a.unwrap().created_at, b.unwrap().created_at);
}

#[tokio::test]
async fn store_location_creates_then_overwrites() {
  let s = store().await;
  let coords = Coordinates {
    latitude:  "39.92".parse().unwrap(),
    longitude: "116.48".parse().unwrap(),
  };

  let created = s
    .store_location(
      "o-abc".into(),
      StoredLocation {
        country:  Some("0".into()),
        province: Some("110100".into()),
        city:     Some("110100".into()),
        district: Some("110105".into()),
      },
      Some(coords),
    )
    .await
    .unwrap();
  assert_eq!(city_district(&created.location()), (Some("110100"), Some("110105")));
  assert_eq!(created.latitude, Some(coords.latitude));

  let moved = s
    .store_location(
      "o-abc".into(),
      StoredLocation {
        country:  Some("0".into()),
        province: Some("310100".into()),
        city:     Some("310100".into()),
        district: Some("310104".into()),
      },
      None,
    )
    .await
    .unwrap();
  assert_eq!(city_district(&moved.location()), (Some("310100"), Some("310104")));
  // Coordinates survive an update that does not carry any.
  assert_eq!(moved.longitude, Some(coords.longitude));
  assert_eq!(moved.created_at, created.created_at);
  assert!(moved.updated_at >= created.updated_at);

  let read = s.get_user("o-abc".into()).await.unwrap().unwrap();
  assert_eq!(read.location(), moved.location());
}

#[tokio::test]
async fn update_location_touches_only_present_fields() {
  let s = store().await;
  s.store_location(
    "o-abc".into(),
    StoredLocation {
      country:  Some("0".into()),
      province: Some("110100".into()),
      city:     Some("110100".into()),
      district: Some("110105".into()),
    },
    None,
  )
  .await
  .unwrap();

  let update = LocationUpdate::builder().province("110000").district("110101").build();
  let user = s.update_location("o-abc".into(), update).await.unwrap().unwrap();

  assert_eq!(user.country.as_deref(), Some("0"));
  assert_eq!(user.province.as_deref(), Some("110000"));
  assert_eq!(user.city.as_deref(), Some("110100"));
  assert_eq!(user.district.as_deref(), Some("110101"));
}

const LONG_AGO: &str = "2020-01-01T00:00:00+00:00";

/// Insert a blank user whose timestamps both read [`LONG_AGO`].
async fn seed_stale_user(s: &SqliteStore, user_id: &'static str) {
  s.conn
    .call(move |conn| {
      conn.execute(
        "INSERT INTO user_info (user_id, created_at, updated_at) VALUES (?1, ?2, ?2)",
        rusqlite::params![user_id, LONG_AGO],
      )?;
      Ok(())
    })
    .await
    .unwrap();
}

fn long_ago() -> DateTime<Utc> { LONG_AGO.parse().unwrap() }

#[tokio::test]
async fn store_location_refreshes_updated_at() {
  let s = store().await;
  seed_stale_user(&s, "o-stale").await;

  let location = StoredLocation { city: Some("110100".into()), ..Default::default() };
  let user = s.store_location("o-stale".into(), location, None).await.unwrap();

  assert_eq!(user.created_at, long_ago());
  assert!(user.updated_at > long_ago());
}

#[tokio::test]
async fn update_location_refreshes_updated_at() {
  let s = store().await;
  seed_stale_user(&s, "o-stale").await;

  let update = LocationUpdate::builder().district("110105").build();
  let user = s.update_location("o-stale".into(), update).await.unwrap().unwrap();

  assert_eq!(user.created_at, long_ago());
  assert!(user.updated_at > long_ago());

  let read = s.get_user("o-stale".into()).await.unwrap().unwrap();
  assert_eq!(read.updated_at, user.updated_at);
}

#[tokio::test]
async fn update_location_missing_user_creates_nothing() {
  let s = store().await;
  let update = LocationUpdate::builder().city("110100").build();

  let result = s.update_location("o-missing".into(), update).await.unwrap();
  assert!(result.is_none());
  assert!(s.get_user("o-missing".into()).await.unwrap().is_none());
}
