//! Geocoding collaborator interface.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{GeoPoint, Ring};

/// A single geocoder candidate
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub display_name: String,
    /// Representative point of the area
    pub center: GeoPoint,
    /// Outline, when the geocoder has an areal geometry for the candidate
    pub boundary: Option<Ring>,
}

/// Forward and reverse area lookup.
///
/// `Ok(None)` means the service answered with zero candidates. Transport
/// failures and non-success statuses are `UpstreamUnavailable` errors.
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    async fn lookup_by_name(&self, text: &str) -> Result<Option<GeocodeResult>>;

    async fn lookup_by_point(&self, point: GeoPoint) -> Result<Option<GeocodeResult>>;
}
