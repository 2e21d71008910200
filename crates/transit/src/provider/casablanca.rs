//! Built-in Casablanca tramway and bus network.

use std::sync::{Arc, OnceLock};

use geo::Point;

use crate::identifiers::*;
use crate::models::schedule::{DaySchedule, ScheduleDescriptor, TimeOfDay};
use crate::models::types::{LineKind, StationKind};
use crate::provider::static_provider::{LineImpl, StaticTransitProvider, StationImpl};

/// Map center used when nothing better is known (Place Mohammed V)
pub const CITY_CENTER: (f64, f64) = (33.5731, -7.5898);

struct StationRow {
    id: &'static str,
    name: &'static str,
    lat: f64,
    lon: f64,
    lines: &'static [&'static str],
    kind: StationKind,
    zone: &'static str,
    address: &'static str,
}

struct LineRow {
    id: &'static str,
    name: &'static str,
    kind: LineKind,
    color: &'static str,
    stations: &'static [&'static str],
    weekday: DaySchedule,
    weekend: DaySchedule,
}

const fn day(start: TimeOfDay, end: TimeOfDay, headway_minutes: u32) -> DaySchedule {
    DaySchedule::new(start, end, headway_minutes)
}

#[rustfmt::skip]
const STATIONS: &[StationRow] = &[
    // Tramway T1 / T2
    StationRow { id: "casa-port", name: "Casa Port", lat: 33.5731, lon: -7.6298, lines: &["T1"], kind: StationKind::Tramway, zone: "1", address: "Boulevard Hassan II, Casablanca" },
    StationRow { id: "place-mohammed-v", name: "Place Mohammed V", lat: 33.5731, lon: -7.5898, lines: &["T1", "T2"], kind: StationKind::Mixed, zone: "1", address: "Place Mohammed V, Casablanca" },
    StationRow { id: "casa-voyageurs", name: "Casa Voyageurs", lat: 33.5667, lon: -7.5833, lines: &["T1"], kind: StationKind::Tramway, zone: "1", address: "Gare Casa Voyageurs, Casablanca" },
    StationRow { id: "maarif", name: "Maarif", lat: 33.5589, lon: -7.6298, lines: &["T1", "T2"], kind: StationKind::Mixed, zone: "2", address: "Quartier Maarif, Casablanca" },
    StationRow { id: "racine", name: "Racine", lat: 33.5456, lon: -7.6456, lines: &["T1"], kind: StationKind::Tramway, zone: "2", address: "Boulevard Rachidi, Casablanca" },
    StationRow { id: "ain-diab", name: "Ain Diab", lat: 33.5389, lon: -7.6789, lines: &["T2"], kind: StationKind::Tramway, zone: "3", address: "Corniche Ain Diab, Casablanca" },
    StationRow { id: "ibn-tachfine", name: "Ibn Tachfine", lat: 33.5756, lon: -7.5723, lines: &["T2"], kind: StationKind::Tramway, zone: "1", address: "Boulevard Ibn Tachfine, Casablanca" },
    StationRow { id: "hay-hassani", name: "Hay Hassani", lat: 33.5823, lon: -7.5567, lines: &["T2", "B20"], kind: StationKind::Mixed, zone: "2", address: "Hay Hassani, Casablanca" },
    // Bus
    StationRow { id: "sidi-maarouf", name: "Sidi Maarouf", lat: 33.5123, lon: -7.5234, lines: &["B20", "B15"], kind: StationKind::Bus, zone: "3", address: "Sidi Maarouf, Casablanca" },
    StationRow { id: "technopark", name: "Technopark", lat: 33.5089, lon: -7.5178, lines: &["B20"], kind: StationKind::Bus, zone: "3", address: "Technopark Casablanca" },
    StationRow { id: "anfa", name: "Anfa", lat: 33.5634, lon: -7.6234, lines: &["B15", "B10"], kind: StationKind::Bus, zone: "2", address: "Quartier Anfa, Casablanca" },
    StationRow { id: "bourgogne", name: "Bourgogne", lat: 33.5712, lon: -7.6123, lines: &["B10"], kind: StationKind::Bus, zone: "2", address: "Quartier Bourgogne, Casablanca" },
    StationRow { id: "gauthier", name: "Gauthier", lat: 33.5798, lon: -7.6045, lines: &["B10", "B15"], kind: StationKind::Bus, zone: "1", address: "Quartier Gauthier, Casablanca" },
    StationRow { id: "palmier", name: "Palmier", lat: 33.5845, lon: -7.5967, lines: &["B15"], kind: StationKind::Bus, zone: "1", address: "Boulevard du Palmier, Casablanca" },
    StationRow { id: "derb-sultan", name: "Derb Sultan", lat: 33.5678, lon: -7.5789, lines: &["B10"], kind: StationKind::Bus, zone: "1", address: "Derb Sultan, Casablanca" },
];

#[rustfmt::skip]
const LINES: &[LineRow] = &[
    LineRow {
        id: "T1", name: "Tramway T1", kind: LineKind::Tramway, color: "#0066CC",
        stations: &["casa-port", "place-mohammed-v", "casa-voyageurs", "maarif", "racine"],
        weekday: day(TimeOfDay::hm(6, 0), TimeOfDay::hm(23, 0), 8),
        weekend: day(TimeOfDay::hm(7, 0), TimeOfDay::hm(22, 0), 12),
    },
    LineRow {
        id: "T2", name: "Tramway T2", kind: LineKind::Tramway, color: "#CC6600",
        stations: &["ibn-tachfine", "place-mohammed-v", "maarif", "hay-hassani", "ain-diab"],
        weekday: day(TimeOfDay::hm(6, 0), TimeOfDay::hm(23, 0), 10),
        weekend: day(TimeOfDay::hm(7, 0), TimeOfDay::hm(22, 0), 15),
    },
    LineRow {
        id: "B20", name: "Bus B20", kind: LineKind::Bus, color: "#009900",
        stations: &["hay-hassani", "sidi-maarouf", "technopark"],
        weekday: day(TimeOfDay::hm(5, 30), TimeOfDay::hm(22, 30), 15),
        weekend: day(TimeOfDay::hm(6, 30), TimeOfDay::hm(21, 30), 20),
    },
    LineRow {
        id: "B15", name: "Bus B15", kind: LineKind::Bus, color: "#990099",
        stations: &["sidi-maarouf", "anfa", "gauthier", "palmier"],
        weekday: day(TimeOfDay::hm(6, 0), TimeOfDay::hm(22, 0), 12),
        weekend: day(TimeOfDay::hm(7, 0), TimeOfDay::hm(21, 0), 18),
    },
    LineRow {
        id: "B10", name: "Bus B10", kind: LineKind::Bus, color: "#FF6600",
        stations: &["anfa", "bourgogne", "gauthier", "derb-sultan"],
        weekday: day(TimeOfDay::hm(5, 45), TimeOfDay::hm(22, 15), 10),
        weekend: day(TimeOfDay::hm(6, 45), TimeOfDay::hm(21, 15), 15),
    },
];

fn build() -> StaticTransitProvider {
    let stations = STATIONS
        .iter()
        .map(|row| StationImpl {
            id: StationIdentifier::new(row.id),
            name: row.name.into(),
            location: Point::new(row.lon, row.lat),
            lines: row.lines.iter().map(LineIdentifier::new).collect(),
            kind: row.kind,
            zone: row.zone.into(),
            address: Some(Arc::from(row.address)),
        })
        .collect();

    let lines = LINES
        .iter()
        .map(|row| LineImpl {
            id: LineIdentifier::new(row.id),
            name: row.name.into(),
            kind: row.kind,
            color: row.color.into(),
            station_ids: row.stations.iter().map(StationIdentifier::new).collect(),
            schedule: Some(ScheduleDescriptor {
                weekday: row.weekday,
                weekend: row.weekend,
            }),
        })
        .collect();

    StaticTransitProvider::from_data(stations, lines)
}

/// The built-in network, built on first use and shared for the life of the process.
pub fn network() -> &'static StaticTransitProvider {
    static NETWORK: OnceLock<StaticTransitProvider> = OnceLock::new();
    NETWORK.get_or_init(build)
}
