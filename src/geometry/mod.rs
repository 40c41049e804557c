//! Network-free geometry: buffer construction and containment filtering.

mod buffer;
mod containment;

pub use buffer::{
    build_buffer, build_buffer_with_vertices, utm_zone, BUFFER_VERTICES, DEFAULT_BUFFER_RADIUS_M,
    MAX_UTM_LATITUDE,
};
pub use containment::{filter_inside, Containment};
