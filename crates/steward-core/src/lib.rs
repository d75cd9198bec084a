//! Core types and trait definitions for the weather steward backend.
//!
//! No HTTP or database dependencies. The storage backend, the upstream API
//! clients and the HTTP surface all depend on this crate.

#![allow(async_fn_in_trait)]

pub mod error;
pub mod region;
pub mod resolve;
pub mod store;
pub mod upstream;
pub mod user;

pub use error::{Error, Result};
