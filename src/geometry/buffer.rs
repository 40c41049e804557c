//! Circular buffer polygons built in a local UTM projection.

use std::f64::consts::TAU;

use proj4rs::{proj::Proj, transform::transform};

use super::containment::Containment;
use crate::error::{LocatorError, Result};
use crate::models::{GeoPoint, Ring};

/// Distinct vertices sampled along the circle
pub const BUFFER_VERTICES: usize = 64;

/// Radius used when the geocoder returns no boundary
pub const DEFAULT_BUFFER_RADIUS_M: f64 = 1000.0;

/// UTM is defined from 80°S to 84°N; beyond that a polar projection is needed
pub const MAX_UTM_LATITUDE: f64 = 84.0;

const WGS84_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// UTM zone for a longitude: `floor((lon + 180) / 6) + 1`, with 180° folded into zone 60.
pub fn utm_zone(lon: f64) -> Result<u32> {
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(LocatorError::Projection(format!(
            "longitude {} has no UTM zone",
            lon
        )));
    }

    let zone = ((lon + 180.0) / 6.0).floor() as u32 + 1;
    Ok(zone.min(60))
}

/// PROJ.4 string for the WGS84 UTM zone containing `center`
fn utm_proj4(center: GeoPoint) -> Result<String> {
    let zone = utm_zone(center.lon)?;
    let south = if center.lat < 0.0 { " +south" } else { "" };
    Ok(format!(
        "+proj=utm +zone={zone}{south} +datum=WGS84 +units=m +no_defs +type=crs"
    ))
}

fn build_proj(proj_string: &str) -> Result<Proj> {
    Proj::from_proj_string(proj_string).map_err(|e| {
        LocatorError::Projection(format!("failed to build PROJ.4 {}: {}", proj_string, e))
    })
}

/// Build a closed polygon approximating a circle of `radius_m` meters around `center`.
///
/// Uses [`BUFFER_VERTICES`] vertices. See [`build_buffer_with_vertices`].
pub fn build_buffer(center: GeoPoint, radius_m: f64) -> Result<Ring> {
    build_buffer_with_vertices(center, radius_m, BUFFER_VERTICES)
}

/// Build a closed polygon approximating a circle of `radius_m` meters around `center`.
///
/// The center is projected into its UTM zone, the circle is sampled there in
/// meters starting due east and running counter-clockwise, and every vertex is
/// projected back to lon/lat. The ring has `vertices + 1` coordinates, the
/// last repeating the first.
///
/// Accuracy is bounded by the UTM scale error (about 0.04% near the central
/// meridian), which is fine for kilometer-scale buffers.
///
/// Centers beyond [`MAX_UTM_LATITUDE`] and circles that would cross the
/// antimeridian are rejected with [`LocatorError::Projection`]: a lon/lat ring
/// cannot represent them without wrapping around the globe.
pub fn build_buffer_with_vertices(center: GeoPoint, radius_m: f64, vertices: usize) -> Result<Ring> {
    if !center.is_valid() {
        return Err(LocatorError::Projection(format!(
            "center out of range: lat={}, lon={}",
            center.lat, center.lon
        )));
    }
    if center.lat.abs() > MAX_UTM_LATITUDE {
        return Err(LocatorError::Projection(format!(
            "latitude {} is outside the UTM domain (|lat| <= {})",
            center.lat, MAX_UTM_LATITUDE
        )));
    }
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(LocatorError::Projection(format!(
            "buffer radius must be positive, got {}",
            radius_m
        )));
    }
    if vertices < 3 {
        return Err(LocatorError::Projection(format!(
            "a buffer needs at least 3 vertices, got {}",
            vertices
        )));
    }

    let geographic = build_proj(WGS84_PROJ4)?;
    let utm = build_proj(&utm_proj4(center)?)?;

    // proj4rs works in radians for geographic coordinates
    let mut origin = (center.lon.to_radians(), center.lat.to_radians(), 0.0);
    transform(&geographic, &utm, &mut origin)
        .map_err(|e| LocatorError::Projection(format!("forward projection failed: {}", e)))?;

    let mut points = Vec::with_capacity(vertices + 1);
    for i in 0..vertices {
        let theta = TAU * i as f64 / vertices as f64;
        let mut vertex = (
            origin.0 + radius_m * theta.cos(),
            origin.1 + radius_m * theta.sin(),
            0.0,
        );
        transform(&utm, &geographic, &mut vertex)
            .map_err(|e| LocatorError::Projection(format!("inverse projection failed: {}", e)))?;

        points.push(GeoPoint {
            lat: vertex.1.to_degrees(),
            lon: vertex.0.to_degrees(),
        });
    }

    if crosses_antimeridian(&points) {
        return Err(LocatorError::Projection(format!(
            "a {} m buffer around lat={}, lon={} crosses the antimeridian",
            radius_m, center.lat, center.lon
        )));
    }

    let ring = Ring::closing(points).map_err(|e| LocatorError::Projection(e.to_string()))?;
    if !Containment::new(&ring).contains(&center) {
        return Err(LocatorError::Projection(format!(
            "buffer around lat={}, lon={} does not contain its center",
            center.lat, center.lon
        )));
    }

    Ok(ring)
}

/// True when consecutive vertices (closing edge included) jump more than 180° in longitude
fn crosses_antimeridian(points: &[GeoPoint]) -> bool {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .any(|(a, b)| (a.lon - b.lon).abs() > 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Centroid;

    /// Great-circle distance on the mean earth sphere, in meters
    fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
        const R: f64 = 6_371_008.8;
        let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (b.lon - a.lon).to_radians();
        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * R * h.sqrt().asin()
    }

    fn center() -> GeoPoint {
        GeoPoint {
            lat: 40.0,
            lon: -75.0,
        }
    }

    #[test]
    fn test_utm_zone() {
        assert_eq!(utm_zone(-180.0).unwrap(), 1);
        assert_eq!(utm_zone(-75.0).unwrap(), 18);
        assert_eq!(utm_zone(0.0).unwrap(), 31);
        assert_eq!(utm_zone(16.4).unwrap(), 33);
        assert_eq!(utm_zone(179.9).unwrap(), 60);
        assert_eq!(utm_zone(180.0).unwrap(), 60);
        assert!(utm_zone(181.0).is_err());
        assert!(utm_zone(f64::NAN).is_err());
    }

    #[test]
    fn test_buffer_is_closed_with_64_vertices() {
        let ring = build_buffer(center(), 1000.0).unwrap();
        assert_eq!(ring.vertex_count(), BUFFER_VERTICES);
        assert_eq!(ring.len(), BUFFER_VERTICES + 1);
        assert_eq!(ring.points().first(), ring.points().last());
    }

    #[test]
    fn test_buffer_vertices_within_radius() {
        let ring = build_buffer(center(), 1000.0).unwrap();

        for vertex in ring.points() {
            let d = haversine_m(center(), *vertex);
            assert!(d > 995.0 && d < 1005.0, "vertex {:?} at {} m", vertex, d);
        }
    }

    #[test]
    fn test_buffer_centroid_near_center() {
        for c in [
            center(),
            GeoPoint { lat: -33.9, lon: 18.4 },
            GeoPoint { lat: 64.1, lon: -21.9 },
            GeoPoint { lat: 0.5, lon: 5.99 },
        ] {
            let ring = build_buffer(c, 2500.0).unwrap();
            let centroid = ring.to_polygon().centroid().unwrap();
            assert!((centroid.x() - c.lon).abs() < 1e-4, "{:?} vs {:?}", centroid, c);
            assert!((centroid.y() - c.lat).abs() < 1e-4, "{:?} vs {:?}", centroid, c);
        }
    }

    #[test]
    fn test_buffer_contains_center() {
        for c in [
            center(),
            GeoPoint { lat: 0.0, lon: 179.9 },
            GeoPoint { lat: -17.0, lon: -179.9 },
            GeoPoint { lat: 83.9, lon: 10.0 },
            GeoPoint { lat: -79.9, lon: 0.0 },
        ] {
            let ring = build_buffer(c, 2500.0).unwrap();
            let bbox = ring.bbox();
            assert!(bbox.max_lon - bbox.min_lon < 1.0, "{:?} spans {:?}", c, bbox);
            assert!(Containment::new(&ring).contains(&c), "{:?}", c);
        }
    }

    #[test]
    fn test_buffer_across_antimeridian_rejected() {
        for c in [
            GeoPoint { lat: 0.0, lon: 179.995 },
            GeoPoint { lat: -17.0, lon: -179.999 },
            GeoPoint { lat: 0.0, lon: 180.0 },
        ] {
            assert!(
                matches!(build_buffer(c, 1000.0), Err(LocatorError::Projection(_))),
                "{:?}",
                c
            );
        }
    }

    #[test]
    fn test_buffer_near_poles_rejected() {
        for c in [
            GeoPoint { lat: 89.999, lon: 10.0 },
            GeoPoint { lat: 90.0, lon: 0.0 },
            GeoPoint { lat: -85.0, lon: 0.0 },
        ] {
            assert!(
                matches!(build_buffer(c, 1000.0), Err(LocatorError::Projection(_))),
                "{:?}",
                c
            );
        }
    }

    #[test]
    fn test_crosses_antimeridian() {
        let west = GeoPoint { lat: 0.0, lon: 179.99 };
        let east = GeoPoint { lat: 0.0, lon: -179.99 };
        let near = GeoPoint { lat: 0.0, lon: 179.0 };
        assert!(crosses_antimeridian(&[west, near, east]));
        assert!(!crosses_antimeridian(&[west, near, west]));
    }

    #[test]
    fn test_buffer_counter_clockwise() {
        use geo::Winding;
        let ring = build_buffer(center(), 1000.0).unwrap();
        assert!(ring.to_polygon().exterior().is_ccw());
    }

    #[test]
    fn test_custom_vertex_count() {
        let ring = build_buffer_with_vertices(center(), 500.0, 16).unwrap();
        assert_eq!(ring.vertex_count(), 16);
        assert!(build_buffer_with_vertices(center(), 500.0, 2).is_err());
    }

    #[test]
    fn test_invalid_radius() {
        assert!(matches!(
            build_buffer(center(), 0.0),
            Err(LocatorError::Projection(_))
        ));
        assert!(matches!(
            build_buffer(center(), -5.0),
            Err(LocatorError::Projection(_))
        ));
        assert!(build_buffer(center(), f64::INFINITY).is_err());
    }

    #[test]
    fn test_invalid_center() {
        let bad = GeoPoint {
            lat: 40.0,
            lon: 200.0,
        };
        assert!(matches!(
            build_buffer(bad, 1000.0),
            Err(LocatorError::Projection(_))
        ));
    }
}
