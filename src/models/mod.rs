//! Core data models for area search and feature export.

pub mod boundary;
pub mod place;
pub mod query;

pub use boundary::{BoundaryResult, GeoJsonPolygon, Ring};
pub use place::{FeatureRecord, GeoBbox, GeoPoint, OsmType, RawElement};
pub use query::{AreaQuery, CoordinateQuery, NameQuery, TagFilter};
