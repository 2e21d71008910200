//! Seams to external geocoding and routing services.

pub mod fallback;
pub mod traits;

pub use fallback::{plan_route, plan_trip, RouteEstimate};
pub use traits::{Geocoder, RoutePlanner, RouteSummary};
