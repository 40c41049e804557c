//! Feature database collaborator interface.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{GeoBbox, RawElement, TagFilter};

/// Query for elements carrying `tag` inside a bounding box.
///
/// Results are raw: nothing is filtered against the actual boundary here.
#[async_trait]
pub trait FeatureQueryClient: Send + Sync {
    async fn query_features(&self, tag: &TagFilter, bbox: &GeoBbox) -> Result<Vec<RawElement>>;
}
