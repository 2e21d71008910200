//! Pluggable geocoding and routing traits.
//!
//! External crates implement these on top of whatever service they use
//! (Nominatim, OSRM, ...). This crate never performs network IO itself.

use std::future::Future;
use std::pin::Pin;

use geo::{LineString, Point};

use crate::models::types::Result;

/// A route computed by a routing service
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_minutes: u32,
    /// Path of the route, if the service returned one
    pub geometry: Option<LineString>,
}

/// Resolve a free-text address to a location
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the address is unknown
    fn geocode<'a>(
        &'a self,
        address: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Point>>> + Send + 'a>>;
}

/// Compute a route between two locations
pub trait RoutePlanner: Send + Sync {
    fn route<'a>(
        &'a self,
        from: Point,
        to: Point,
    ) -> Pin<Box<dyn Future<Output = Result<RouteSummary>> + Send + 'a>>;
}
