//! Area lookup against a geocoding service.

mod client;
mod nominatim;
mod resolver;

pub use client::{GeocodeResult, GeocodingClient};
pub use nominatim::{
    parse_reverse_response, parse_search_response, NominatimClient, DEFAULT_NOMINATIM_URL,
};
pub use resolver::BoundaryResolver;
