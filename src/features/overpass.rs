//! Overpass API client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::FeatureQueryClient;
use crate::error::{LocatorError, Result};
use crate::models::{GeoBbox, GeoPoint, OsmType, RawElement, TagFilter};

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Feature database backed by an Overpass interpreter endpoint
pub struct OverpassClient {
    client: Client,
    url: String,
    /// Server-side query timeout, in seconds
    query_timeout: u64,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
    /// Set on server-side failures such as `runtime error: Query timed out ...`
    remark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    osm_type: OsmType,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    /// Present on ways and relations with `out center`
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    fn into_raw(self) -> RawElement {
        let location = match (self.osm_type, self.lat, self.lon) {
            (OsmType::Node, Some(lat), Some(lon)) => GeoPoint::new(lat, lon).ok(),
            (OsmType::Node, _, _) => None,
            _ => self
                .center
                .and_then(|c| GeoPoint::new(c.lat, c.lon).ok()),
        };

        RawElement {
            osm_type: self.osm_type,
            osm_id: self.id,
            location,
            tags: self.tags,
        }
    }
}

impl OverpassClient {
    pub fn new(url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                LocatorError::UpstreamUnavailable(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self::with_client(client, url, timeout))
    }

    /// Use a preconfigured HTTP client; `timeout` becomes the server-side query timeout
    pub fn with_client(client: Client, url: &str, timeout: Duration) -> Self {
        Self {
            client,
            url: url.to_string(),
            query_timeout: timeout.as_secs().max(1),
        }
    }
}

/// Overpass QL selecting nodes, ways and relations tagged `tag` inside `bbox`.
///
/// Ways and relations are returned with their center (`out center`).
pub fn build_query(tag: &TagFilter, bbox: &GeoBbox, timeout_secs: u64) -> String {
    let selector = format!(r#"["{}"="{}"]"#, tag.key(), tag.value());
    // Overpass bbox order: south, west, north, east
    let area = format!(
        "({},{},{},{})",
        bbox.min_lat, bbox.min_lon, bbox.max_lat, bbox.max_lon
    );

    format!(
        "[out:json][timeout:{timeout}];\n(\n  node{sel}{area};\n  way{sel}{area};\n  relation{sel}{area};\n);\nout center;\n",
        timeout = timeout_secs,
        sel = selector,
        area = area
    )
}

/// Parse an Overpass JSON body into raw elements.
///
/// Overpass reports query timeouts and memory aborts with status 200 and an
/// error `remark`; the elements sent alongside are partial, so the whole
/// response is treated as a failure.
pub fn parse_elements(body: &str) -> Result<Vec<RawElement>> {
    let response: OverpassResponse = serde_json::from_str(body).map_err(|e| {
        LocatorError::UpstreamUnavailable(format!("unexpected Overpass response: {}", e))
    })?;

    if let Some(remark) = response.remark.as_deref().filter(|r| r.contains("error")) {
        warn!("Overpass query failed: {}", remark);
        return Err(LocatorError::UpstreamUnavailable(format!(
            "Overpass query failed: {}",
            remark
        )));
    }

    Ok(response
        .elements
        .into_iter()
        .map(OverpassElement::into_raw)
        .collect())
}

#[async_trait]
impl FeatureQueryClient for OverpassClient {
    async fn query_features(&self, tag: &TagFilter, bbox: &GeoBbox) -> Result<Vec<RawElement>> {
        let query = build_query(tag, bbox, self.query_timeout);
        debug!("Overpass query: {}", query);

        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("data", &query)
            .finish();

        let response = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Overpass request failed: {}", e);
                LocatorError::from(e)
            })?;

        if !response.status().is_success() {
            warn!("Overpass returned status {}", response.status());
            return Err(LocatorError::UpstreamUnavailable(format!(
                "Error connecting to Overpass API (status {})",
                response.status()
            )));
        }

        let body = response.text().await?;
        let elements = parse_elements(&body)?;

        info!("Overpass returned {} elements for {}", elements.len(), tag);
        Ok(elements)
    }
}
