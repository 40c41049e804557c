//! Error types shared by the resolver, the feature search and the exporter.

use thiserror::Error;

/// Result type for locator operations.
pub type Result<T> = std::result::Result<T, LocatorError>;

/// Errors surfaced by every core operation.
///
/// Nothing here is retried by the library; the HTTP layer maps each variant
/// to a status code and a user-facing message.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Malformed or missing caller input
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The upstream service answered but had no candidates
    #[error("no result: {0}")]
    NoResult(String),

    /// Network failure, timeout or non-success status from an upstream service
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Bad input to the buffer builder (center out of range or outside UTM, radius <= 0,
    /// circle across the antimeridian)
    #[error("projection error: {0}")]
    Projection(String),

    /// A ring that is not closed or has fewer than 4 coordinates
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    /// Export was called without any records
    #[error("no data to export")]
    EmptyInput,

    /// The CSV writer failed
    #[error("export failed: {0}")]
    Export(String),
}

impl From<reqwest::Error> for LocatorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LocatorError::UpstreamUnavailable(format!("request timed out: {}", err))
        } else {
            LocatorError::UpstreamUnavailable(err.to_string())
        }
    }
}

impl From<csv::Error> for LocatorError {
    fn from(err: csv::Error) -> Self {
        LocatorError::Export(err.to_string())
    }
}
