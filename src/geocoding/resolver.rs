//! Boundary resolution: geocoder outline, or a synthesized buffer.

use std::sync::Arc;

use tracing::{debug, info};

use super::{GeocodeResult, GeocodingClient};
use crate::error::{LocatorError, Result};
use crate::geometry::{build_buffer_with_vertices, BUFFER_VERTICES, DEFAULT_BUFFER_RADIUS_M};
use crate::models::{AreaQuery, BoundaryResult};

/// Resolves an area query into a display name, boundary ring and center
pub struct BoundaryResolver {
    geocoder: Arc<dyn GeocodingClient>,
    buffer_radius_m: f64,
    buffer_vertices: usize,
}

impl BoundaryResolver {
    pub fn new(geocoder: Arc<dyn GeocodingClient>) -> Self {
        Self {
            geocoder,
            buffer_radius_m: DEFAULT_BUFFER_RADIUS_M,
            buffer_vertices: BUFFER_VERTICES,
        }
    }

    /// Override the fallback buffer used when the geocoder has no outline
    pub fn with_buffer(mut self, radius_m: f64, vertices: usize) -> Self {
        self.buffer_radius_m = radius_m;
        self.buffer_vertices = vertices;
        self
    }

    /// Look the area up (one outbound call) and return its boundary.
    ///
    /// Zero candidates is `NoResult`. A candidate without an areal geometry
    /// gets a circular buffer around its center.
    pub async fn resolve(&self, query: &AreaQuery) -> Result<BoundaryResult> {
        let candidate = match query {
            AreaQuery::Name(name) => {
                debug!("Resolving area by name: {}", name.text);
                self.geocoder
                    .lookup_by_name(&name.text)
                    .await?
                    .ok_or_else(|| {
                        LocatorError::NoResult(format!("No area found with name: {}", name.text))
                    })?
            }
            AreaQuery::Coordinates(coords) => {
                debug!(
                    "Resolving area at ({}, {})",
                    coords.point.lon, coords.point.lat
                );
                self.geocoder
                    .lookup_by_point(coords.point)
                    .await?
                    .ok_or_else(|| {
                        LocatorError::NoResult("No area found at this location".to_string())
                    })?
            }
        };

        self.boundary_for(candidate)
    }

    fn boundary_for(&self, candidate: GeocodeResult) -> Result<BoundaryResult> {
        let GeocodeResult {
            display_name,
            center,
            boundary,
        } = candidate;

        let polygon = match boundary {
            Some(ring) => ring,
            None => {
                info!(
                    "No boundary for '{}', buffering {} m around ({}, {})",
                    display_name, self.buffer_radius_m, center.lon, center.lat
                );
                build_buffer_with_vertices(center, self.buffer_radius_m, self.buffer_vertices)?
            }
        };

        Ok(BoundaryResult {
            display_name,
            polygon,
            center,
        })
    }
}
