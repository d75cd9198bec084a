//! Baidu Map: reverse geocoding (v3) and district weather (v1).

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use steward_core::{
  Error, Result,
  upstream::{ForecastProvider, GeocodedPlace, ReverseGeocoder},
};

use crate::UpstreamClient;

const SERVICE: &str = "Baidu Map API";

/// Country code reported when the response carries none; never supported.
const UNKNOWN_COUNTRY: i64 = -1;

/// Common response wrapper. `result` is kept untyped because Baidu sends an
/// empty array in its place on failure.
#[derive(Debug, Deserialize)]
struct Envelope {
  status:  i64,
  message: Option<String>,
  #[serde(default)]
  result:  Value,
}

impl Envelope {
  fn into_result(self) -> Result<Value> {
    if self.status != 0 {
      tracing::warn!(status = self.status, message = ?self.message, "Baidu Map API refused request");
      return Err(Error::Upstream {
        service: SERVICE.into(),
        status:  Some(self.status),
        message: self.message.unwrap_or_else(|| "Unknown error".into()),
      });
    }
    Ok(self.result)
  }
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResult {
  #[serde(rename = "addressComponent", default)]
  address_component: AddressComponent,
}

#[derive(Debug, Default, Deserialize)]
struct AddressComponent {
  country_code: Option<i64>,
  /// Usually a string, but tolerate a bare number.
  adcode:       Option<Value>,
}

fn adcode_text(v: Value) -> Option<String> {
  match v {
    Value::String(s) => Some(s),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

impl ReverseGeocoder for UpstreamClient {
  async fn reverse_geocode(&self, latitude: Decimal, longitude: Decimal) -> Result<GeocodedPlace> {
    let ak = self.baidu_ak()?;
    let url = Self::url(&self.config.baidu_base_url, "/reverse_geocoding/v3/");
    let location = format!("{latitude},{longitude}");

    let envelope: Envelope = self
      .get_json(
        SERVICE,
        &url,
        &[
          ("ak", ak),
          ("output", "json"),
          ("coordtype", "gcj02ll"),
          ("location", location.as_str()),
          ("language", "zh-CN"),
        ],
      )
      .await?;

    let result: ReverseResult = serde_json::from_value(envelope.into_result()?)
      .map_err(|e| Error::upstream(SERVICE, format!("undecodable result: {e}")))?;
    let component = result.address_component;

    Ok(GeocodedPlace {
      country_code: component.country_code.unwrap_or(UNKNOWN_COUNTRY),
      adcode:       component.adcode.and_then(adcode_text),
    })
  }
}

impl ForecastProvider for UpstreamClient {
  async fn forecast(&self, district: String) -> Result<Value> {
    let ak = self.baidu_ak()?;
    let url = Self::url(&self.config.baidu_base_url, "/weather/v1/");

    let envelope: Envelope = self
      .get_json(
        SERVICE,
        &url,
        &[("ak", ak), ("district_id", district.as_str()), ("data_type", "all")],
      )
      .await?;

    let forecasts = envelope
      .into_result()?
      .get("forecasts")
      .cloned()
      .unwrap_or_else(|| Value::Object(Default::default()));
    Ok(forecasts)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::test_support::{client_for, unconfigured};

  fn coords() -> (Decimal, Decimal) {
    ("39.92".parse().unwrap(), "116.48".parse().unwrap())
  }

  async fn mount_reverse(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
      .and(path("/reverse_geocoding/v3/"))
      .and(query_param("ak", "test-ak"))
      .and(query_param("location", "39.92,116.48"))
      .and(query_param("coordtype", "gcj02ll"))
      .respond_with(ResponseTemplate::new(200).set_body_json(body))
      .mount(server)
      .await;
  }

  #[tokio::test]
  async fn reverse_geocode_extracts_country_and_adcode() {
    let mock_server = MockServer::start().await;
    mount_reverse(
      &mock_server,
      json!({
        "status": 0,
        "result": {
          "formatted_address": "北京市朝阳区",
          "addressComponent": { "country": "中国", "country_code": 0, "adcode": "110105" }
        }
      }),
    )
    .await;

    let (lat, lng) = coords();
    let place = client_for(&mock_server.uri()).reverse_geocode(lat, lng).await.unwrap();
    assert_eq!(place, GeocodedPlace { country_code: 0, adcode: Some("110105".into()) });
  }

  #[tokio::test]
  async fn numeric_adcode_is_accepted() {
    let mock_server = MockServer::start().await;
    mount_reverse(
      &mock_server,
      json!({
        "status": 0,
        "result": { "addressComponent": { "country_code": 0, "adcode": 110105 } }
      }),
    )
    .await;

    let (lat, lng) = coords();
    let place = client_for(&mock_server.uri()).reverse_geocode(lat, lng).await.unwrap();
    assert_eq!(place.adcode.as_deref(), Some("110105"));
  }

  #[tokio::test]
  async fn missing_country_code_is_never_supported() {
    let mock_server = MockServer::start().await;
    mount_reverse(&mock_server, json!({ "status": 0, "result": {} })).await;

    let (lat, lng) = coords();
    let place = client_for(&mock_server.uri()).reverse_geocode(lat, lng).await.unwrap();
    assert_ne!(place.country_code, 0);
    assert!(place.adcode.is_none());
  }

  #[tokio::test]
  async fn nonzero_status_is_upstream_error() {
    let mock_server = MockServer::start().await;
    mount_reverse(
      &mock_server,
      json!({ "status": 240, "message": "APP 服务被禁用", "result": [] }),
    )
    .await;

    let (lat, lng) = coords();
    let err = client_for(&mock_server.uri()).reverse_geocode(lat, lng).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Upstream { status: Some(240), ref message, .. } if message == "APP 服务被禁用"
    ));
  }

  #[tokio::test]
  async fn http_failure_is_upstream_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(502))
      .mount(&mock_server)
      .await;

    let (lat, lng) = coords();
    let err = client_for(&mock_server.uri()).reverse_geocode(lat, lng).await.unwrap_err();
    assert!(matches!(err, Error::Upstream { status: None, .. }));
  }

  #[tokio::test]
  async fn forecast_returns_forecasts_member() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/weather/v1/"))
      .and(query_param("district_id", "110105"))
      .and(query_param("data_type", "all"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "status": 0,
        "result": {
          "now": { "temp": 21 },
          "forecasts": [{ "date": "2026-10-16", "high": 22, "low": 11 }]
        }
      })))
      .mount(&mock_server)
      .await;

    let forecasts = client_for(&mock_server.uri()).forecast("110105".into()).await.unwrap();
    assert_eq!(forecasts, json!([{ "date": "2026-10-16", "high": 22, "low": 11 }]));
  }

  #[tokio::test]
  async fn forecast_without_forecasts_is_empty_object() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/weather/v1/"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 0, "result": {} })))
      .mount(&mock_server)
      .await;

    let forecasts = client_for(&mock_server.uri()).forecast("110105".into()).await.unwrap();
    assert_eq!(forecasts, json!({}));
  }

  #[tokio::test]
  async fn missing_ak_is_configuration_error() {
    let client = unconfigured("http://127.0.0.1:9");

    let err = client.forecast("110105".into()).await.unwrap_err();
    assert_eq!(err.to_string(), "Missing Baidu Map AK configuration");

    let (lat, lng) = coords();
    let err = client.reverse_geocode(lat, lng).await.unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
  }
}
