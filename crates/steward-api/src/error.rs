//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use steward_core::Error;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Service(#[from] Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let err = match self {
      ApiError::BadRequest(m) => {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response();
      }
      ApiError::Service(err) => err,
    };

    let (status, body) = match &err {
      Error::Validation(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      Error::NoFieldsProvided => (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() })),
      Error::Auth { errcode, errmsg } => (
        StatusCode::BAD_REQUEST,
        json!({ "error": "WeChat login failed", "errcode": errcode, "errmsg": errmsg }),
      ),
      Error::UserNotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": "User not found" })),
      Error::LocationNotFound { .. } => (StatusCode::NOT_FOUND, json!({ "error": err.to_string() })),
      Error::Upstream { service, status: Some(status), message } => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": format!("{service} error"), "status": status, "message": message }),
      ),
      // No upstream status: the message alone describes the failure.
      Error::Upstream { message, status: None, .. } => {
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
      }
      Error::RegionNotFound(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Failed to get city info" }))
      }
      Error::UnsupportedRegion { .. } | Error::Configuration(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": err.to_string() }))
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
