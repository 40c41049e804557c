//! HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use tracing::debug;

use super::wire::{
    ApiError, ExportRequest, SearchAreaRequest, SearchAreaResponse, SearchRequest, SearchResponse,
};
use super::AppState;
use crate::error::LocatorError;
use crate::export::{export_table, EXPORT_FILENAME};

/// Unwrap a JSON body, turning axum's rejection into an `InvalidQuery`
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError(LocatorError::InvalidQuery(rejection.body_text())))
}

/// Health check endpoint
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Resolve an area by name or coordinates into its boundary
pub async fn search_area_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchAreaRequest>, JsonRejection>,
) -> Result<Json<SearchAreaResponse>, ApiError> {
    let query = body(payload)?.into_query()?;
    let result = state.resolver.resolve(&query).await?;

    debug!(
        "Resolved '{}' with {} boundary coordinates",
        result.display_name,
        result.polygon.len()
    );

    Ok(Json(SearchAreaResponse::from(result)))
}

/// Find tagged features inside a drawn shape or a resolved area boundary
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let (tag, ring) = body(payload)?.into_query()?;
    let results = state.features.search(&tag, &ring).await?;

    Ok(Json(SearchResponse { results }))
}

/// Download search results as CSV
pub async fn export_handler(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = body(payload)?;
    let csv = export_table(&request.results)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", EXPORT_FILENAME),
            ),
        ],
        csv,
    )
        .into_response())
}
