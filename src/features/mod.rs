//! Point-of-interest queries against a feature database.

mod client;
mod overpass;
mod search;

pub use client::FeatureQueryClient;
pub use overpass::{build_query, parse_elements, OverpassClient, DEFAULT_OVERPASS_URL};
pub use search::FeatureSearch;
