//! Point and feature types shared by the geocoding and feature search paths.

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{LocatorError, Result};

/// Type of OSM element returned by the feature database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

impl OsmType {
    /// Name used in Overpass JSON and in `type/id` references
    pub fn as_str(self) -> &'static str {
        match self {
            OsmType::Node => "node",
            OsmType::Way => "way",
            OsmType::Relation => "relation",
        }
    }
}

impl std::fmt::Display for OsmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic point (lat/lon, WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Build a point, rejecting coordinates outside [-90,90] x [-180,180]
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let point = Self { lat, lon };
        if !point.is_valid() {
            return Err(LocatorError::InvalidQuery(format!(
                "coordinates out of range: lat={}, lon={}",
                lat, lon
            )));
        }
        Ok(point)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Planar coordinate with x = longitude, y = latitude
    pub fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }

    pub fn from_coord(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lon: coord.x,
        }
    }

    pub fn to_point(self) -> Point<f64> {
        Point::from(self.to_coord())
    }
}

/// Axis-aligned bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBbox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBbox {
    /// Smallest box enclosing all points, or None for an empty slice
    pub fn enclosing(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_lat: first.lat,
            min_lon: first.lon,
            max_lat: first.lat,
            max_lon: first.lon,
        };

        Some(points.iter().fold(init, |bbox, p| Self {
            min_lat: bbox.min_lat.min(p.lat),
            min_lon: bbox.min_lon.min(p.lon),
            max_lat: bbox.max_lat.max(p.lat),
            max_lon: bbox.max_lon.max(p.lon),
        }))
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }
}

/// Element as returned by the feature database, before containment filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElement {
    pub osm_type: OsmType,
    pub osm_id: i64,
    /// Own coordinate for nodes, representative center for ways and relations
    pub location: Option<GeoPoint>,
    pub tags: HashMap<String, String>,
}

impl RawElement {
    /// OSM reference such as `way/123`
    pub fn osm_ref(&self) -> String {
        format!("{}/{}", self.osm_type, self.osm_id)
    }

    /// Convert into a feature record. Elements without a location are dropped.
    pub fn into_record(self) -> Option<FeatureRecord> {
        let Some(location) = self.location else {
            debug!("Dropping {}: no location", self.osm_ref());
            return None;
        };
        let name = self
            .tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| "Unnamed".to_string());

        Some(FeatureRecord {
            name,
            location,
            tags: self.tags,
        })
    }
}

/// A tagged point of interest, as searched, filtered and exported.
///
/// Serializes flat as `{ "name", "lat", "lon", "tags" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub name: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl FeatureRecord {
    pub fn new(name: &str, location: GeoPoint) -> Self {
        Self {
            name: name.to_string(),
            location,
            tags: HashMap::new(),
        }
    }

    /// Add a tag, replacing any previous value for the key
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }
}
