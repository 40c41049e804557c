//! HTTP API: area search, feature search and CSV export.

mod handlers;
mod wire;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::FeatureSearch;
use crate::geocoding::BoundaryResolver;

pub use handlers::{export_handler, health_handler, search_area_handler, search_handler};
pub use wire::{
    ApiError, DrawnVertex, ErrorBody, ExportRequest, SearchAreaRequest, SearchAreaResponse,
    SearchRequest, SearchResponse,
};

/// Application state shared across handlers
pub struct AppState {
    pub resolver: BoundaryResolver,
    pub features: FeatureSearch,
}

/// Build the API router. Middleware layers are added by the caller.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/search_area", post(search_area_handler))
        .route("/search", post(search_handler))
        .route("/export", post(export_handler))
        .with_state(state)
}
