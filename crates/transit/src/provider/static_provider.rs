//! In-memory transit provider over a fixed station/line table.
//!
//! Tables are read once and never mutated, so the provider can be shared
//! freely between threads.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use geo::{LineString, Point};

use crate::identifiers::*;
use crate::models::{schedule::ScheduleDescriptor, traits::*, types::*};
use crate::spatial::index::StationIndex;
use crate::spatial::queries::route_length_km;

// ============================================================================
// Concrete Implementations of Traits
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationImpl {
    pub id: StationIdentifier,
    pub name: Arc<str>,
    #[cfg_attr(feature = "serde", serde(rename = "coordinates", with = "lat_lon"))]
    pub location: Point,
    pub lines: Vec<LineIdentifier>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: StationKind,
    pub zone: Arc<str>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub address: Option<Arc<str>>,
}

impl TransitStation for StationImpl {
    fn id(&self) -> &StationIdentifier {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Point {
        self.location
    }

    fn lines(&self) -> &[LineIdentifier] {
        &self.lines
    }

    fn kind(&self) -> StationKind {
        self.kind
    }

    fn zone(&self) -> &str {
        &self.zone
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineImpl {
    pub id: LineIdentifier,
    pub name: Arc<str>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: LineKind,
    pub color: Arc<str>,
    #[cfg_attr(feature = "serde", serde(rename = "stations"))]
    pub station_ids: Vec<StationIdentifier>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub schedule: Option<ScheduleDescriptor>,
}

impl TransitLine for LineImpl {
    fn id(&self) -> &LineIdentifier {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> LineKind {
        self.kind
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn station_ids(&self) -> &[StationIdentifier] {
        &self.station_ids
    }

    fn schedule(&self) -> Option<&ScheduleDescriptor> {
        self.schedule.as_ref()
    }
}

/// Stations are exchanged as `[latitude, longitude]` pairs
#[cfg(feature = "serde")]
mod lat_lon {
    use geo::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(point: &Point, serializer: S) -> Result<S::Ok, S::Error> {
        [point.y(), point.x()].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Point, D::Error> {
        let [lat, lon] = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Point::new(lon, lat))
    }
}

// ============================================================================
// Static Provider
// ============================================================================

/// In-memory transit provider with a station spatial index
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone)]
pub struct StaticTransitProvider {
    // Core data, in table order
    stations: Vec<Arc<StationImpl>>,
    lines: Vec<Arc<LineImpl>>,

    // Lookup maps (first occurrence wins on duplicate ids)
    station_map: HashMap<StationIdentifier, Arc<StationImpl>>,
    line_map: HashMap<LineIdentifier, Arc<LineImpl>>,

    station_index: StationIndex,
}

impl StaticTransitProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self::from_data(Vec::new(), Vec::new())
    }

    /// Build a provider from raw tables.
    ///
    /// Integrity problems are logged as warnings; lookups skip dangling
    /// references.
    pub fn from_data(stations: Vec<StationImpl>, lines: Vec<LineImpl>) -> Self {
        let stations: Vec<Arc<StationImpl>> = stations.into_iter().map(Arc::new).collect();
        let lines: Vec<Arc<LineImpl>> = lines.into_iter().map(Arc::new).collect();

        let mut station_map = HashMap::with_capacity(stations.len());
        for station in &stations {
            station_map
                .entry(station.id.clone())
                .or_insert_with(|| station.clone());
        }

        let mut line_map = HashMap::with_capacity(lines.len());
        for line in &lines {
            line_map.entry(line.id.clone()).or_insert_with(|| line.clone());
        }

        let station_index = StationIndex::new(&stations);

        let provider = Self {
            stations,
            lines,
            station_map,
            line_map,
            station_index,
        };

        for issue in provider.integrity_issues() {
            tracing::warn!("transit data integrity: {}", issue);
        }
        tracing::debug!(
            stations = provider.stations.len(),
            lines = provider.lines.len(),
            "loaded transit tables"
        );

        provider
    }

    /// Like [`from_data`](Self::from_data) but rejects tables with any
    /// integrity problem.
    pub fn try_from_data(stations: Vec<StationImpl>, lines: Vec<LineImpl>) -> Result<Self> {
        let provider = Self::from_data(stations, lines);
        match provider.integrity_issues().into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(provider),
        }
    }

    /// Every violated invariant of the tables, in a stable order
    pub fn integrity_issues(&self) -> Vec<TransitError> {
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        for station in &self.stations {
            if !seen.insert(&station.id) {
                issues.push(TransitError::InvalidData(format!(
                    "Duplicate station id {}",
                    station.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for line in &self.lines {
            if !seen.insert(&line.id) {
                issues.push(TransitError::InvalidData(format!("Duplicate line id {}", line.id)));
            }
        }

        for station in &self.stations {
            if station.lines.is_empty() {
                issues.push(TransitError::InvalidData(format!(
                    "Station {} is not served by any line",
                    station.id
                )));
            }

            for line_id in &station.lines {
                match self.line_map.get(line_id) {
                    None => issues.push(TransitError::InvalidData(format!(
                        "Station {} lists unknown line {}",
                        station.id, line_id
                    ))),
                    Some(line) if !station.kind.serves(line.kind) => {
                        issues.push(TransitError::InvalidData(format!(
                            "Station {} is {} but line {} is {}",
                            station.id, station.kind, line_id, line.kind
                        )))
                    }
                    Some(line) if !line.station_ids.contains(&station.id) => {
                        issues.push(TransitError::InvalidData(format!(
                            "Station {} lists line {} which does not stop there",
                            station.id, line_id
                        )))
                    }
                    Some(_) => {}
                }
            }
        }

        for line in &self.lines {
            for station_id in &line.station_ids {
                if !self.station_map.contains_key(station_id) {
                    issues.push(TransitError::InvalidData(format!(
                        "Line {} references unknown station {}",
                        line.id, station_id
                    )));
                }
            }

            if let Some(Err(err)) = line.schedule.as_ref().map(ScheduleDescriptor::validate) {
                issues.push(TransitError::InvalidData(format!(
                    "Line {} has an invalid schedule: {}",
                    line.id, err
                )));
            }
        }

        issues
    }

    /// Path through a line's stations in stop order
    pub fn line_geometry(&self, line_id: &LineIdentifier) -> Option<LineString> {
        let line = self.line_map.get(line_id)?;
        let coords: Vec<_> = line
            .station_ids
            .iter()
            .filter_map(|id| self.station_map.get(id))
            .map(|s| s.location.0)
            .collect();

        Some(LineString::new(coords))
    }

    /// Straight-line length of a line from its first to last stop
    pub fn line_length_km(&self, line_id: &LineIdentifier) -> Option<f64> {
        self.line_geometry(line_id).map(|path| route_length_km(&path))
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl Default for StaticTransitProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitProvider for StaticTransitProvider {
    fn get_station(&self, id: &StationIdentifier) -> Option<Arc<dyn TransitStation>> {
        self.station_map.get(id).map(|s| s.clone() as Arc<dyn TransitStation>)
    }

    fn get_line(&self, id: &LineIdentifier) -> Option<Arc<dyn TransitLine>> {
        self.line_map.get(id).map(|l| l.clone() as Arc<dyn TransitLine>)
    }

    fn all_stations(&self) -> Vec<Arc<dyn TransitStation>> {
        self.stations
            .iter()
            .map(|s| s.clone() as Arc<dyn TransitStation>)
            .collect()
    }

    fn all_lines(&self) -> Vec<Arc<dyn TransitLine>> {
        self.lines
            .iter()
            .map(|l| l.clone() as Arc<dyn TransitLine>)
            .collect()
    }

    fn nearest_stations(&self, point: Point, max_distance_km: f64) -> Vec<NearbyStation> {
        self.station_index
            .within_km(point, max_distance_km)
            .into_iter()
            .map(|(node, distance_km)| NearbyStation {
                station: node.station.clone() as Arc<dyn TransitStation>,
                distance_km,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::{DaySchedule, TimeOfDay};

    fn station(id: &str, name: &str, lines: &[&str], lon: f64, lat: f64) -> StationImpl {
        StationImpl {
            id: StationIdentifier::new(id),
            name: name.into(),
            location: Point::new(lon, lat),
            lines: lines.iter().map(LineIdentifier::new).collect(),
            kind: StationKind::Tramway,
            zone: "1".into(),
            address: None,
        }
    }

    fn line(id: &str, stations: &[&str]) -> LineImpl {
        LineImpl {
            id: LineIdentifier::new(id),
            name: format!("Tramway {}", id).into(),
            kind: LineKind::Tramway,
            color: "#0066CC".into(),
            station_ids: stations.iter().map(StationIdentifier::new).collect(),
            schedule: Some(ScheduleDescriptor {
                weekday: DaySchedule::new(TimeOfDay::hm(6, 0), TimeOfDay::hm(23, 0), 8),
                weekend: DaySchedule::new(TimeOfDay::hm(7, 0), TimeOfDay::hm(22, 0), 12),
            }),
        }
    }

    fn provider() -> StaticTransitProvider {
        StaticTransitProvider::from_data(
            vec![
                station("a", "Alpha", &["L1"], -7.60, 33.57),
                station("b", "Beta", &["L1", "L2"], -7.59, 33.57),
                station("c", "Gamma", &["L2"], -7.58, 33.57),
            ],
            vec![line("L1", &["a", "b"]), line("L2", &["b", "c"])],
        )
    }

    #[test]
    fn test_empty_provider() {
        let provider = StaticTransitProvider::new();
        assert_eq!(provider.all_stations().len(), 0);
        assert_eq!(provider.all_lines().len(), 0);
        assert!(provider.nearest_stations(Point::new(0.0, 0.0), 10.0).is_empty());
    }

    #[test]
    fn test_provider_lookups() {
        let provider = provider();

        assert!(provider.get_station(&StationIdentifier::new("a")).is_some());
        assert!(provider.get_line(&LineIdentifier::new("L2")).is_some());
        assert!(provider.get_station(&StationIdentifier::new("z")).is_none());
        assert!(provider.integrity_issues().is_empty());
    }

    #[test]
    fn test_dangling_station_is_dropped() {
        let provider = StaticTransitProvider::from_data(
            vec![station("a", "Alpha", &["L1"], -7.60, 33.57)],
            vec![line("L1", &["a", "ghost"])],
        );

        let on_line = provider.stations_on_line(&LineIdentifier::new("L1"));
        assert_eq!(on_line.len(), 1);
        assert_eq!(on_line[0].id().as_str(), "a");
        assert_eq!(provider.integrity_issues().len(), 1);
    }

    #[test]
    fn test_try_from_data_rejects_bad_tables() {
        let result = StaticTransitProvider::try_from_data(
            vec![station("a", "Alpha", &["L9"], -7.60, 33.57)],
            vec![line("L1", &["a"])],
        );
        assert!(matches!(result, Err(TransitError::InvalidData(_))));

        let result = StaticTransitProvider::try_from_data(
            vec![station("a", "Alpha", &[], -7.60, 33.57)],
            vec![],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_integrity_issues() {
        let mut bad_schedule = line("L1", &["a"]);
        bad_schedule.schedule = Some(ScheduleDescriptor {
            weekday: DaySchedule::new(TimeOfDay::hm(6, 0), TimeOfDay::hm(23, 0), 0),
            weekend: DaySchedule::new(TimeOfDay::hm(7, 0), TimeOfDay::hm(22, 0), 12),
        });

        let mut bus_only = station("b", "Beta", &["L1"], -7.59, 33.57);
        bus_only.kind = StationKind::Bus;

        let provider = StaticTransitProvider::from_data(
            vec![
                station("a", "Alpha", &["L1"], -7.60, 33.57),
                station("a", "Alpha again", &["L1"], -7.60, 33.57),
                bus_only,
            ],
            vec![bad_schedule],
        );

        let messages: Vec<String> = provider
            .integrity_issues()
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert!(messages.iter().any(|m| m.contains("Duplicate station id a")));
        assert!(messages.iter().any(|m| m.contains("Station b is bus but line L1 is tramway")));
        assert!(messages.iter().any(|m| m.contains("invalid schedule")));

        // First occurrence wins
        let a = provider.get_station(&StationIdentifier::new("a")).unwrap();
        assert_eq!(a.name(), "Alpha");
    }

    #[test]
    fn test_station_by_name_prefers_table_order() {
        let provider = StaticTransitProvider::from_data(
            vec![
                station("a", "Gare Centrale", &["L1"], -7.60, 33.57),
                station("b", "GARE CENTRALE", &["L1"], -7.59, 33.57),
            ],
            vec![line("L1", &["a", "b"])],
        );

        let found = provider.get_station_by_name("gare centrale").unwrap();
        assert_eq!(found.id().as_str(), "a");
        let found = provider.get_station_by_name("GARE CENTRALE").unwrap();
        assert_eq!(found.id().as_str(), "a");
    }

    #[test]
    fn test_line_geometry() {
        let provider = provider();
        let path = provider.line_geometry(&LineIdentifier::new("L1")).unwrap();
        assert_eq!(path.coords().count(), 2);

        let length = provider.line_length_km(&LineIdentifier::new("L1")).unwrap();
        assert!(length > 0.9 && length < 1.0, "got {}", length);
        assert!(provider.line_length_km(&LineIdentifier::new("nope")).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_tables() {
        let json = r#"{
            "id": "casa-port",
            "name": "Casa Port",
            "coordinates": [33.5731, -7.6298],
            "lines": ["T1"],
            "type": "tramway",
            "zone": "1"
        }"#;
        let station: StationImpl = serde_json::from_str(json).unwrap();
        assert!((station.location.y() - 33.5731).abs() < 1e-9);
        assert!((station.location.x() + 7.6298).abs() < 1e-9);
        assert_eq!(station.address, None);

        let value = serde_json::to_value(&station).unwrap();
        let lat = value["coordinates"][0].as_f64().unwrap();
        let lon = value["coordinates"][1].as_f64().unwrap();
        assert!((lat - 33.5731).abs() < 1e-9 && (lon + 7.6298).abs() < 1e-9);
        assert!(value.get("address").is_none());

        let json = r##"{
            "id": "T1",
            "name": "Tramway T1",
            "type": "tramway",
            "color": "#0066CC",
            "stations": ["casa-port"],
            "schedule": {
                "weekday": { "start": "06:00", "end": "23:00", "frequency": 8 },
                "weekend": { "start": "07:00", "end": "22:00", "frequency": 12 }
            }
        }"##;
        let line: LineImpl = serde_json::from_str(json).unwrap();
        let schedule = line.schedule.unwrap();
        assert_eq!(schedule.weekday.headway_minutes, 8);
        assert_eq!(schedule.weekend.start, TimeOfDay::hm(7, 0));
    }
}
