//! Request and response bodies for the HTTP API, and their validation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::{LocatorError, Result};
use crate::models::{
    AreaQuery, BoundaryResult, FeatureRecord, GeoJsonPolygon, GeoPoint, Ring, TagFilter,
};

const DEFAULT_CATEGORY: &str = "amenity";
const DEFAULT_VALUE: &str = "restaurant";

/// `POST /search_area` body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAreaRequest {
    pub area_name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl SearchAreaRequest {
    pub fn into_query(self) -> Result<AreaQuery> {
        AreaQuery::from_parts(self.area_name.as_deref(), self.lat, self.lon)
    }
}

#[derive(Debug, Serialize)]
pub struct SearchAreaResponse {
    pub name: String,
    pub boundary: GeoJsonPolygon,
    pub center: GeoPoint,
}

impl From<BoundaryResult> for SearchAreaResponse {
    fn from(result: BoundaryResult) -> Self {
        Self {
            name: result.display_name,
            boundary: GeoJsonPolygon::from_ring(&result.polygon),
            center: result.center,
        }
    }
}

/// Vertex of a shape drawn on the map (Leaflet `LatLng`)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DrawnVertex {
    pub lat: f64,
    pub lng: f64,
}

/// `POST /search` body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub category: Option<String>,
    pub value: Option<String>,
    #[serde(default = "default_use_drawn_shape")]
    pub use_drawn_shape: bool,
    #[serde(default)]
    pub coordinates: Vec<DrawnVertex>,
    pub boundary: Option<GeoJsonPolygon>,
}

fn default_use_drawn_shape() -> bool {
    true
}

impl SearchRequest {
    /// Validate into a tag filter and a closed boundary ring
    pub fn into_query(self) -> Result<(TagFilter, Ring)> {
        let tag = TagFilter::new(
            self.category.as_deref().unwrap_or(DEFAULT_CATEGORY),
            self.value.as_deref().unwrap_or(DEFAULT_VALUE),
        )?;

        let ring = if self.use_drawn_shape {
            if self.coordinates.is_empty() {
                return Err(LocatorError::InvalidQuery(
                    "No shape coordinates provided".to_string(),
                ));
            }
            let vertices = self
                .coordinates
                .iter()
                .map(|v| GeoPoint::new(v.lat, v.lng))
                .collect::<Result<Vec<_>>>()?;
            Ring::closing(vertices)?
        } else {
            self.boundary
                .ok_or_else(|| LocatorError::InvalidQuery("Invalid boundary data".to_string()))?
                .exterior()?
        };

        Ok((tag, ring))
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<FeatureRecord>,
}

/// `POST /export` body
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub results: Vec<FeatureRecord>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler error: a [`LocatorError`] rendered as `{"error": ...}` with a matching status
#[derive(Debug)]
pub struct ApiError(pub LocatorError);

impl From<LocatorError> for ApiError {
    fn from(err: LocatorError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LocatorError::InvalidQuery(_)
            | LocatorError::InvalidPolygon(_)
            | LocatorError::EmptyInput => StatusCode::BAD_REQUEST,
            LocatorError::NoResult(_) => StatusCode::NOT_FOUND,
            LocatorError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            LocatorError::Projection(_) | LocatorError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the end user
    pub fn message(&self) -> String {
        match &self.0 {
            LocatorError::InvalidQuery(msg)
            | LocatorError::NoResult(msg)
            | LocatorError::UpstreamUnavailable(msg) => msg.clone(),
            LocatorError::InvalidPolygon(msg) => format!("Invalid boundary data: {}", msg),
            LocatorError::EmptyInput => "No data to export".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        (
            status,
            Json(ErrorBody {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_request(body: serde_json::Value) -> SearchRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_search_defaults() {
        let request = search_request(json!({
            "coordinates": [
                { "lat": 0.0, "lng": 0.0 },
                { "lat": 0.0, "lng": 1.0 },
                { "lat": 1.0, "lng": 1.0 }
            ]
        }));
        assert!(request.use_drawn_shape);

        let (tag, ring) = request.into_query().unwrap();
        assert_eq!(tag.to_string(), "amenity=restaurant");
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.points()[1], GeoPoint { lat: 0.0, lon: 1.0 });
    }

    #[test]
    fn test_search_drawn_shape_required() {
        let request = search_request(json!({ "useDrawnShape": true }));
        assert!(matches!(
            request.into_query(),
            Err(LocatorError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_search_degenerate_shape() {
        let request = search_request(json!({
            "coordinates": [{ "lat": 0.0, "lng": 0.0 }, { "lat": 1.0, "lng": 1.0 }]
        }));
        assert!(matches!(
            request.into_query(),
            Err(LocatorError::InvalidPolygon(_))
        ));
    }

    #[test]
    fn test_search_with_area_boundary() {
        let request = search_request(json!({
            "category": "shop",
            "value": "bakery",
            "useDrawnShape": false,
            "boundary": {
                "type": "Polygon",
                "coordinates": [[[2.0, 48.0], [3.0, 48.0], [3.0, 49.0], [2.0, 48.0]]]
            }
        }));

        let (tag, ring) = request.into_query().unwrap();
        assert_eq!(tag.to_string(), "shop=bakery");
        assert_eq!(ring.points()[1], GeoPoint { lat: 48.0, lon: 3.0 });
    }

    #[test]
    fn test_search_missing_area_boundary() {
        let request = search_request(json!({ "useDrawnShape": false }));
        assert!(matches!(
            request.into_query(),
            Err(LocatorError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (LocatorError::InvalidQuery("x".into()), StatusCode::BAD_REQUEST),
            (LocatorError::InvalidPolygon("x".into()), StatusCode::BAD_REQUEST),
            (LocatorError::EmptyInput, StatusCode::BAD_REQUEST),
            (LocatorError::NoResult("x".into()), StatusCode::NOT_FOUND),
            (LocatorError::UpstreamUnavailable("x".into()), StatusCode::BAD_GATEWAY),
            (LocatorError::Projection("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (LocatorError::Export("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }
}
