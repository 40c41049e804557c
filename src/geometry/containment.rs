//! Point-in-polygon filtering of feature records.

use geo::{Intersects, Polygon};
use tracing::debug;

use crate::models::{FeatureRecord, GeoBbox, GeoPoint, Ring};

/// Boundary prepared for repeated containment tests
pub struct Containment {
    polygon: Polygon<f64>,
    bbox: GeoBbox,
}

impl Containment {
    pub fn new(boundary: &Ring) -> Self {
        Self {
            polygon: boundary.to_polygon(),
            bbox: boundary.bbox(),
        }
    }

    /// True when `point` lies inside the ring or on its edge
    pub fn contains(&self, point: &GeoPoint) -> bool {
        // Envelope check first, then the exact test
        self.bbox.contains(point) && self.polygon.intersects(&point.to_point())
    }
}

/// Keep the candidates whose location lies inside `boundary`.
///
/// Points exactly on an edge or vertex count as inside. The result is an
/// order-preserving subsequence of `candidates`; inputs are not modified.
/// Ring validity (closed, at least 4 coordinates) is enforced when the
/// [`Ring`] is built, so an invalid boundary never reaches this function.
pub fn filter_inside(boundary: &Ring, candidates: &[FeatureRecord]) -> Vec<FeatureRecord> {
    let containment = Containment::new(boundary);

    let inside: Vec<FeatureRecord> = candidates
        .iter()
        .filter(|record| containment.contains(&record.location))
        .cloned()
        .collect();

    debug!(
        "Containment filter kept {} of {} candidates",
        inside.len(),
        candidates.len()
    );

    inside
}
