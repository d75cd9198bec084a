//! Error types for `steward-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Missing or malformed caller input.
  #[error("{0}")]
  Validation(String),

  #[error("No fields to update")]
  NoFieldsProvided,

  #[error("User not found: {0}")]
  UserNotFound(String),

  /// The reverse-geocoded adcode has no row in the region catalog.
  #[error("Failed to get city info for adcode {0}")]
  RegionNotFound(String),

  #[error("no such location")]
  LocationNotFound { city: String, district: String },

  #[error("This country is not supported at this time")]
  UnsupportedRegion { country_code: i64 },

  /// A third-party API answered with a failure, or could not be reached.
  #[error("{service} error: {message}")]
  Upstream {
    service: String,
    /// The upstream's own status code, when it reported one.
    status:  Option<i64>,
    message: String,
  },

  /// The identity provider rejected the login code.
  #[error("login failed: {errmsg} (errcode {errcode})")]
  Auth { errcode: i64, errmsg: String },

  /// A required secret or credential is not configured.
  #[error("Missing {0} configuration")]
  Configuration(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Upstream { service: service.into(), status: None, message: message.into() }
  }

  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
