//! Spatial indexing and query utilities.

pub mod index;
pub mod polyline;
pub mod queries;

pub use index::StationIndex;
pub use polyline::decode_polyline;
pub use queries::{haversine_km, route_length_km, DEFAULT_SEARCH_RADIUS_KM, EARTH_RADIUS_KM};
