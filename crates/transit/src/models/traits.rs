//! Core traits for transit entities.
//!
//! These traits define the public interface for transit data.
//! Implementations can be in-memory, database-backed, or remote.
//!
//! Lookups never fail: an unknown identifier yields `None` or an empty list.

use chrono::NaiveDateTime;
use geo::Point;
use std::collections::HashSet;
use std::sync::Arc;

use crate::departures::{next_departure, NextDeparture};
use crate::identifiers::*;
use crate::models::schedule::ScheduleDescriptor;
use crate::models::types::*;
use crate::spatial::queries::haversine_km;

// ============================================================================
// Core Entity Traits
// ============================================================================

/// A transit station (named stop served by one or more lines)
pub trait TransitStation: Send + Sync {
    fn id(&self) -> &StationIdentifier;
    fn name(&self) -> &str;

    /// Location as (x = longitude, y = latitude) in degrees
    fn location(&self) -> Point;

    /// Lines stopping here, never empty in valid data
    fn lines(&self) -> &[LineIdentifier];

    fn kind(&self) -> StationKind;

    /// Fare zone label (e.g. "1")
    fn zone(&self) -> &str;

    fn address(&self) -> Option<&str> {
        None
    }

    fn is_served_by(&self, line: &LineIdentifier) -> bool {
        self.lines().contains(line)
    }
}

/// A transport line (e.g. "Tramway T1", "Bus B20")
pub trait TransitLine: Send + Sync {
    fn id(&self) -> &LineIdentifier;
    fn name(&self) -> &str;
    fn kind(&self) -> LineKind;

    /// Display color (hex RGB, e.g. "#0066CC")
    fn color(&self) -> &str;

    /// Stations in physical stop order
    fn station_ids(&self) -> &[StationIdentifier];

    fn schedule(&self) -> Option<&ScheduleDescriptor> {
        None
    }
}

/// A station matched by a proximity search
#[derive(Clone)]
pub struct NearbyStation {
    pub station: Arc<dyn TransitStation>,
    pub distance_km: f64,
}

impl std::fmt::Debug for NearbyStation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearbyStation")
            .field("station", self.station.id())
            .field("distance_km", &self.distance_km)
            .finish()
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Provider of all transit data with lookup and query methods
pub trait TransitProvider: Send + Sync {
    // ---- Lookups ----
    fn get_station(&self, id: &StationIdentifier) -> Option<Arc<dyn TransitStation>>;
    fn get_line(&self, id: &LineIdentifier) -> Option<Arc<dyn TransitLine>>;

    // ---- Collections ----

    /// Every station, in table order
    fn all_stations(&self) -> Vec<Arc<dyn TransitStation>>;

    /// Every line, in table order
    fn all_lines(&self) -> Vec<Arc<dyn TransitLine>>;

    /// Like [`get_station`](Self::get_station), for callers that treat a
    /// missing station as an error
    fn require_station(&self, id: &StationIdentifier) -> Result<Arc<dyn TransitStation>> {
        self.get_station(id)
            .ok_or_else(|| TransitError::StationNotFound(id.clone()))
    }

    fn require_line(&self, id: &LineIdentifier) -> Result<Arc<dyn TransitLine>> {
        self.get_line(id)
            .ok_or_else(|| TransitError::LineNotFound(id.clone()))
    }

    /// Case-insensitive exact match on the display name.
    ///
    /// If several stations share a name, the first in table order wins.
    fn get_station_by_name(&self, name: &str) -> Option<Arc<dyn TransitStation>> {
        let wanted = name.to_lowercase();
        self.all_stations()
            .into_iter()
            .find(|s| s.name().to_lowercase() == wanted)
    }

    /// Stations of a line in stop order.
    ///
    /// Ids that do not resolve to a station are skipped.
    fn stations_on_line(&self, line_id: &LineIdentifier) -> Vec<Arc<dyn TransitStation>> {
        let Some(line) = self.get_line(line_id) else {
            return Vec::new();
        };

        line.station_ids()
            .iter()
            .filter_map(|id| self.get_station(id))
            .collect()
    }

    /// Lines serving both stations, in the order of the first station's lines
    fn common_lines(
        &self,
        a: &StationIdentifier,
        b: &StationIdentifier,
    ) -> Vec<Arc<dyn TransitLine>> {
        let (Some(a), Some(b)) = (self.get_station(a), self.get_station(b)) else {
            return Vec::new();
        };

        a.lines()
            .iter()
            .filter(|line_id| b.is_served_by(line_id))
            .filter_map(|line_id| self.get_line(line_id))
            .collect()
    }

    /// Every other station reachable without a transfer.
    ///
    /// Stations appear once, in the order first met walking the departure's
    /// lines in turn.
    fn destinations_from(&self, departure: &StationIdentifier) -> Vec<Arc<dyn TransitStation>> {
        let Some(station) = self.get_station(departure) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        station
            .lines()
            .iter()
            .flat_map(|line_id| self.stations_on_line(line_id))
            .filter(|s| s.id() != departure)
            .filter(|s| seen.insert(s.id().clone()))
            .collect()
    }

    /// Stations whose name, address or line ids contain `query`, ignoring case
    fn search_stations(&self, query: &str) -> Vec<Arc<dyn TransitStation>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.all_stations()
            .into_iter()
            .filter(|s| {
                s.name().to_lowercase().contains(&query)
                    || s.address().is_some_and(|a| a.to_lowercase().contains(&query))
                    || s.lines().iter().any(|l| l.as_str().to_lowercase().contains(&query))
            })
            .collect()
    }

    fn line_schedule(&self, line_id: &LineIdentifier) -> Option<ScheduleDescriptor> {
        self.get_line(line_id).and_then(|l| l.schedule().copied())
    }

    /// Next departure of a line, `Unavailable` if it is unknown or has no timetable
    fn next_departure(&self, line_id: &LineIdentifier, now: NaiveDateTime) -> NextDeparture {
        match self.line_schedule(line_id) {
            Some(schedule) => next_departure(&schedule, now),
            None => NextDeparture::Unavailable,
        }
    }

    // ---- Spatial queries ----

    /// Stations within `max_distance_km` (inclusive), nearest first.
    ///
    /// Equal distances keep table order.
    fn nearest_stations(&self, point: Point, max_distance_km: f64) -> Vec<NearbyStation> {
        let mut nearby: Vec<NearbyStation> = self
            .all_stations()
            .into_iter()
            .map(|station| NearbyStation {
                distance_km: haversine_km(point, station.location()),
                station,
            })
            .filter(|n| n.distance_km <= max_distance_km)
            .collect();

        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        nearby
    }
}
