//! Locator - find points of interest inside an area and export them as CSV.
//!
//! This library provides the geometry core, the upstream clients and the HTTP
//! API used by the server binary.

pub mod api;
pub mod error;
pub mod export;
pub mod features;
pub mod geocoding;
pub mod geometry;
pub mod models;

#[cfg(test)]
mod testing;

pub use error::{LocatorError, Result};
pub use models::{BoundaryResult, FeatureRecord, GeoPoint, Ring};
