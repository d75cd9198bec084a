//! JSON HTTP API for the weather steward.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`RegionCatalog`] + [`UserLocationStore`] and any upstream implementing
//! the three collaborator traits. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/weather", steward_api::api_router(state))
//! ```

pub mod area;
pub mod error;
pub mod location;
pub mod login;
pub mod weather;

use std::sync::Arc;

use axum::{Router, routing::get};
use steward_core::{
  store::{RegionCatalog, UserLocationStore},
  upstream::{ForecastProvider, IdentityProvider, ReverseGeocoder},
};

pub use error::ApiError;

// ─── Bounds ──────────────────────────────────────────────────────────────────

/// A store usable by the API: both the catalog and the user table.
pub trait Backend: RegionCatalog + UserLocationStore + 'static {}

impl<T> Backend for T where T: RegionCatalog + UserLocationStore + 'static {}

/// The upstream services the API calls out to.
pub trait Upstream: IdentityProvider + ReverseGeocoder + ForecastProvider + 'static {}

impl<T> Upstream for T where T: IdentityProvider + ReverseGeocoder + ForecastProvider + 'static {}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, U> {
  pub store:    Arc<S>,
  pub upstream: Arc<U>,
}

impl<S, U> AppState<S, U> {
  pub fn new(store: Arc<S>, upstream: Arc<U>) -> Self { Self { store, upstream } }
}

impl<S, U> Clone for AppState<S, U> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), upstream: Arc::clone(&self.upstream) }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, U>(state: AppState<S, U>) -> Router<()>
where
  S: Backend,
  U: Upstream,
{
  Router::new()
    .route("/login", get(login::handler::<S, U>))
    .route(
      "/location",
      get(location::resolve::<S, U>).post(location::update::<S, U>),
    )
    .route("/weather", get(weather::handler::<S, U>))
    // Region catalog
    .route("/area/provinces", get(area::provinces::<S, U>))
    .route("/area/cities", get(area::cities::<S, U>))
    .route("/area/districts", get(area::districts::<S, U>))
    .route("/area/location_name", get(area::location_name::<S, U>))
    .with_state(state)
}
