//! # myway-transit
//!
//! Reference data and queries for the Casablanca tramway and bus network.
//!
//! ## Features
//!
//! - **Static network**: stations and lines compiled into the binary
//! - **Lookups**: stations by id or name, stations of a line, common lines,
//!   destinations reachable without a transfer, free-text search
//! - **Spatial queries**: haversine distances and R-tree backed nearest-station search
//! - **Timetables**: next departure against weekday/weekend headways
//! - **Crowd levels**: predictions from rider reports
//! - **Pluggable routing**: bring your own geocoder and route planner
//!
//! ## Example
//!
//! ```
//! use myway_transit::prelude::*;
//! use geo::Point;
//!
//! let network = casablanca::network();
//!
//! let t1 = network.stations_on_line(&LineIdentifier::new("T1"));
//! assert_eq!(t1[0].name(), "Casa Port");
//!
//! // Stations within 2 km of Place Mohammed V, nearest first
//! let nearby = network.nearest_stations(Point::new(-7.5898, 33.5731), DEFAULT_SEARCH_RADIUS_KM);
//! assert_eq!(nearby[0].station.id().as_str(), "place-mohammed-v");
//! ```

pub mod crowd;
pub mod departures;
pub mod identifiers;
pub mod models;
pub mod network;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::crowd::{
        CrowdLevel, CrowdPrediction, CrowdPredictor, CrowdReport, PredictionTarget, ReportStatus,
    };
    pub use crate::departures::{next_departure, NextDeparture};
    pub use crate::identifiers::*;
    pub use crate::models::{schedule::*, traits::*, types::*};
    pub use crate::network::traits::*;
    pub use crate::provider::{casablanca, LineImpl, StaticTransitProvider, StationImpl};
    pub use crate::spatial::{haversine_km, DEFAULT_SEARCH_RADIUS_KM};
}

pub use prelude::*;
