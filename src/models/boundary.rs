//! Boundary ring and the result of resolving an area.

use geo::{LineString, Polygon};
use serde::{Deserialize, Serialize};

use super::place::{GeoBbox, GeoPoint};
use crate::error::{LocatorError, Result};

/// Closed ring of geographic coordinates.
///
/// Invariants, checked on construction: at least 4 coordinates, first equals
/// last, every coordinate within valid lat/lon ranges. Self-intersection is
/// not checked. The bounding box is computed once here.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<GeoPoint>,
    bbox: GeoBbox,
}

impl Ring {
    pub const MIN_COORDS: usize = 4;

    /// Validate an already closed ring
    pub fn new(points: Vec<GeoPoint>) -> Result<Self> {
        if points.len() < Self::MIN_COORDS {
            return Err(LocatorError::InvalidPolygon(format!(
                "ring needs at least {} coordinates, got {}",
                Self::MIN_COORDS,
                points.len()
            )));
        }

        if points.first() != points.last() {
            return Err(LocatorError::InvalidPolygon(
                "ring is not closed (first coordinate differs from last)".to_string(),
            ));
        }

        if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
            return Err(LocatorError::InvalidPolygon(format!(
                "coordinate out of range: lat={}, lon={}",
                bad.lat, bad.lon
            )));
        }

        let bbox = GeoBbox::enclosing(&points)
            .ok_or_else(|| LocatorError::InvalidPolygon("ring has no coordinates".to_string()))?;

        Ok(Self { points, bbox })
    }

    /// Close an open vertex list (if needed) and validate it
    pub fn closing(mut points: Vec<GeoPoint>) -> Result<Self> {
        if let Some(first) = points.first().copied() {
            if points.last() != Some(&first) {
                points.push(first);
            }
        }
        Self::new(points)
    }

    /// Build from GeoJSON positions (`[lon, lat]`); the ring must already be closed
    pub fn from_positions(positions: &[[f64; 2]]) -> Result<Self> {
        Self::new(
            positions
                .iter()
                .map(|[lon, lat]| GeoPoint {
                    lat: *lat,
                    lon: *lon,
                })
                .collect(),
        )
    }

    /// GeoJSON positions (`[lon, lat]`)
    pub fn to_positions(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.lon, p.lat]).collect()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Number of coordinates, including the closing one
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of distinct vertices (the closing coordinate is not counted)
    pub fn vertex_count(&self) -> usize {
        self.points.len() - 1
    }

    pub fn bbox(&self) -> GeoBbox {
        self.bbox
    }

    /// Planar polygon with x = longitude, y = latitude
    pub fn to_polygon(&self) -> Polygon<f64> {
        let exterior: LineString<f64> = self.points.iter().map(|p| p.to_coord()).collect();
        Polygon::new(exterior, vec![])
    }
}

/// GeoJSON Polygon geometry as exchanged over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPolygon {
    #[serde(rename = "type")]
    pub geo_type: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl GeoJsonPolygon {
    pub fn from_ring(ring: &Ring) -> Self {
        Self {
            geo_type: "Polygon".to_string(),
            coordinates: vec![ring.to_positions()],
        }
    }

    /// Exterior ring of the polygon. Interior rings are ignored.
    pub fn exterior(&self) -> Result<Ring> {
        if self.geo_type != "Polygon" {
            return Err(LocatorError::InvalidPolygon(format!(
                "expected a Polygon geometry, got {}",
                self.geo_type
            )));
        }

        let exterior = self
            .coordinates
            .first()
            .ok_or_else(|| LocatorError::InvalidPolygon("polygon has no rings".to_string()))?;

        Ring::from_positions(exterior)
    }
}

/// Area resolved for a single search request.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryResult {
    pub display_name: String,
    pub polygon: Ring,
    pub center: GeoPoint,
}
