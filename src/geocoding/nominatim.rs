//! Nominatim geocoding client.

use std::time::Duration;

use async_trait::async_trait;
use geo::Area;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::{GeocodeResult, GeocodingClient};
use crate::error::{LocatorError, Result};
use crate::models::{GeoPoint, Ring};

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

const UNKNOWN_AREA: &str = "Unknown Area";

/// Geocoder backed by the Nominatim `/search` and `/reverse` endpoints
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

/// Nominatim returns coordinates as strings; accept numbers too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Number(n) => Some(*n),
            Coordinate::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: Option<String>,
    lat: Coordinate,
    lon: Coordinate,
    /// Parsed separately so an unexpected geometry never fails the whole response
    geojson: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum NominatimGeometry {
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
    #[serde(other)]
    Other,
}

impl NominatimClient {
    /// Create a new Nominatim client. `user_agent` is required by the Nominatim usage policy.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                LocatorError::UpstreamUnavailable(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self::with_client(client, base_url))
    }

    /// Use a preconfigured HTTP client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let url = format!("{}/{}", self.base_url, path);
        Url::parse_with_params(&url, params)
            .map_err(|e| LocatorError::UpstreamUnavailable(format!("bad geocoder URL {}: {}", url, e)))
    }

    async fn fetch(&self, url: Url) -> Result<Value> {
        debug!("Geocoder request: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Geocoder request failed: {}", e);
            LocatorError::from(e)
        })?;

        if !response.status().is_success() {
            warn!("Geocoder returned status {}", response.status());
            return Err(LocatorError::UpstreamUnavailable(format!(
                "Error connecting to geocoding service (status {})",
                response.status()
            )));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl GeocodingClient for NominatimClient {
    async fn lookup_by_name(&self, text: &str) -> Result<Option<GeocodeResult>> {
        let url = self.endpoint(
            "search",
            &[
                ("q", text.to_string()),
                ("format", "json".to_string()),
                ("polygon_geojson", "1".to_string()),
                ("addressdetails", "1".to_string()),
                ("limit", "1".to_string()),
            ],
        )?;

        parse_search_response(self.fetch(url).await?)
    }

    async fn lookup_by_point(&self, point: GeoPoint) -> Result<Option<GeocodeResult>> {
        let url = self.endpoint(
            "reverse",
            &[
                ("lat", point.lat.to_string()),
                ("lon", point.lon.to_string()),
                ("format", "json".to_string()),
                ("polygon_geojson", "1".to_string()),
                ("addressdetails", "1".to_string()),
            ],
        )?;

        parse_reverse_response(self.fetch(url).await?)
    }
}

/// Parse a `/search` body: an array whose first element is the best candidate
pub fn parse_search_response(body: Value) -> Result<Option<GeocodeResult>> {
    let places: Vec<NominatimPlace> = serde_json::from_value(body).map_err(|e| {
        LocatorError::UpstreamUnavailable(format!("unexpected geocoder response: {}", e))
    })?;

    match places.into_iter().next() {
        Some(place) => to_result(place).map(Some),
        None => Ok(None),
    }
}

/// Parse a `/reverse` body: a single object, or `{"error": ...}` when nothing matched
pub fn parse_reverse_response(body: Value) -> Result<Option<GeocodeResult>> {
    if body.is_null() || body.get("error").is_some() {
        return Ok(None);
    }

    let place: NominatimPlace = serde_json::from_value(body).map_err(|e| {
        LocatorError::UpstreamUnavailable(format!("unexpected geocoder response: {}", e))
    })?;

    to_result(place).map(Some)
}

fn to_result(place: NominatimPlace) -> Result<GeocodeResult> {
    let (lat, lon) = match (place.lat.value(), place.lon.value()) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(LocatorError::UpstreamUnavailable(
                "geocoder candidate has no usable coordinates".to_string(),
            ))
        }
    };

    let center = GeoPoint::new(lat, lon).map_err(|e| {
        LocatorError::UpstreamUnavailable(format!("geocoder returned a bad center: {}", e))
    })?;

    let boundary = place.geojson.and_then(boundary_from_geojson);

    Ok(GeocodeResult {
        display_name: place
            .display_name
            .unwrap_or_else(|| UNKNOWN_AREA.to_string()),
        center,
        boundary,
    })
}

/// Outline ring from a GeoJSON geometry.
///
/// Polygons give their exterior; multipolygons the exterior of their largest
/// member. Points, lines and malformed rings give `None`.
fn boundary_from_geojson(geojson: Value) -> Option<Ring> {
    let geometry: NominatimGeometry = match serde_json::from_value(geojson) {
        Ok(g) => g,
        Err(e) => {
            warn!("Ignoring unparseable geocoder geometry: {}", e);
            return None;
        }
    };

    match geometry {
        NominatimGeometry::Polygon { coordinates } => {
            let exterior = coordinates.into_iter().next()?;
            match Ring::from_positions(&exterior) {
                Ok(ring) => Some(ring),
                Err(e) => {
                    warn!("Ignoring geocoder boundary: {}", e);
                    None
                }
            }
        }
        NominatimGeometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .filter_map(|polygon| polygon.first())
            .filter_map(|exterior| Ring::from_positions(exterior).ok())
            .map(|ring| (ring.to_polygon().unsigned_area(), ring))
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, ring)| ring),
        NominatimGeometry::Other => None,
    }
}
