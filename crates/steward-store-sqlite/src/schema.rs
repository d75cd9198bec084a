//! SQL schema for the weather steward SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Administrative divisions. Loaded by import; never written by requests.
CREATE TABLE IF NOT EXISTS area_info (
    district_id       TEXT PRIMARY KEY,   -- six characters
    province          TEXT NOT NULL,
    city              TEXT NOT NULL,
    city_geocode      TEXT NOT NULL,
    district          TEXT NOT NULL,
    district_geocode  TEXT NOT NULL,
    lon               TEXT NOT NULL,      -- decimal, canonical text form
    lat               TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_info (
    user_id       TEXT PRIMARY KEY,
    nickname      TEXT,
    avatar_url    TEXT,
    phone_number  TEXT,
    country       TEXT,
    province      TEXT,
    city          TEXT,
    district      TEXT,               -- usually an area_info.district_geocode
    latitude      TEXT,
    longitude     TEXT,
    created_at    TEXT NOT NULL,      -- ISO 8601 UTC
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS area_province_idx ON area_info(province);
CREATE INDEX IF NOT EXISTS area_city_idx     ON area_info(city_geocode);
CREATE INDEX IF NOT EXISTS area_district_idx ON area_info(district_geocode);

PRAGMA user_version = 1;
";
