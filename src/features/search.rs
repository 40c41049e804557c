//! Feature search: bounding-box query followed by exact containment.

use std::sync::Arc;

use tracing::info;

use super::FeatureQueryClient;
use crate::error::Result;
use crate::geometry::filter_inside;
use crate::models::{FeatureRecord, RawElement, Ring, TagFilter};

/// Finds tagged features inside a boundary ring
pub struct FeatureSearch {
    client: Arc<dyn FeatureQueryClient>,
}

impl FeatureSearch {
    pub fn new(client: Arc<dyn FeatureQueryClient>) -> Self {
        Self { client }
    }

    /// Query the ring's bounding box (one outbound call), drop elements
    /// without a location, then keep only those inside the ring.
    pub async fn search(&self, tag: &TagFilter, boundary: &Ring) -> Result<Vec<FeatureRecord>> {
        let bbox = boundary.bbox();
        let raw = self.client.query_features(tag, &bbox).await?;
        let total = raw.len();

        let candidates: Vec<FeatureRecord> =
            raw.into_iter().filter_map(RawElement::into_record).collect();
        let inside = filter_inside(boundary, &candidates);

        info!(
            "Feature search {}: {} raw, {} placed, {} inside boundary",
            tag,
            total,
            candidates.len(),
            inside.len()
        );

        Ok(inside)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::error::LocatorError;
    use crate::models::{GeoBbox, GeoPoint, OsmType};

    struct StubFeatures {
        elements: Vec<RawElement>,
        seen: Mutex<Vec<(String, GeoBbox)>>,
    }

    #[async_trait]
    impl FeatureQueryClient for StubFeatures {
        async fn query_features(
            &self,
            tag: &TagFilter,
            bbox: &GeoBbox,
        ) -> Result<Vec<RawElement>> {
            self.seen.lock().unwrap().push((tag.to_string(), *bbox));
            Ok(self.elements.clone())
        }
    }

    struct DownFeatures;

    #[async_trait]
    impl FeatureQueryClient for DownFeatures {
        async fn query_features(&self, _: &TagFilter, _: &GeoBbox) -> Result<Vec<RawElement>> {
            Err(LocatorError::UpstreamUnavailable("timed out".to_string()))
        }
    }

    fn element(id: i64, location: Option<(f64, f64)>) -> RawElement {
        let mut tags = HashMap::new();
        tags.insert("name".to_string(), format!("Place {}", id));
        RawElement {
            osm_type: OsmType::Node,
            osm_id: id,
            location: location.map(|(lat, lon)| GeoPoint { lat, lon }),
            tags,
        }
    }

    fn triangle() -> Ring {
        // Lower-left half of the unit square
        Ring::from_positions(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]).unwrap()
    }

    #[tokio::test]
    async fn test_search_filters_to_boundary() {
        let client = Arc::new(StubFeatures {
            elements: vec![
                element(1, Some((0.2, 0.2))),
                // Inside the bbox, outside the triangle
                element(2, Some((0.9, 0.9))),
                element(3, None),
                element(4, Some((0.1, 0.6))),
            ],
            seen: Mutex::new(Vec::new()),
        });
        let search = FeatureSearch::new(client.clone());
        let tag = TagFilter::new("shop", "bakery").unwrap();

        let results = search.search(&tag, &triangle()).await.unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Place 1", "Place 4"]);

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "shop=bakery");
        assert_eq!(
            seen[0].1,
            GeoBbox {
                min_lat: 0.0,
                min_lon: 0.0,
                max_lat: 1.0,
                max_lon: 1.0
            }
        );
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let search = FeatureSearch::new(Arc::new(DownFeatures));
        let tag = TagFilter::new("amenity", "cafe").unwrap();
        assert!(matches!(
            search.search(&tag, &triangle()).await,
            Err(LocatorError::UpstreamUnavailable(_))
        ));
    }
}
