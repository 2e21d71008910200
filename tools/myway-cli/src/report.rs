use anyhow::Result;
use myway_transit::prelude::*;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct StationRow<'a> {
    id: &'a str,
    name: &'a str,
    coordinates: [f64; 2],
    lines: Vec<&'a str>,
    #[serde(rename = "type")]
    kind: StationKind,
    zone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_km: Option<f64>,
}

impl<'a> StationRow<'a> {
    fn new(station: &'a dyn TransitStation, distance_km: Option<f64>) -> Self {
        let location = station.location();
        Self {
            id: station.id().as_str(),
            name: station.name(),
            coordinates: [location.y(), location.x()],
            lines: station.lines().iter().map(|l| l.as_str()).collect(),
            kind: station.kind(),
            zone: station.zone(),
            address: station.address(),
            distance_km,
        }
    }

    fn to_text(&self) -> String {
        let mut text = format!(
            "{:<18} {:<20} [{}] zone {}",
            self.id,
            self.name,
            self.lines.join(", "),
            self.zone
        );
        if let Some(distance) = self.distance_km {
            text.push_str(&format!("  {:.2} km", distance));
        }
        text
    }
}

#[derive(Serialize)]
struct LineRow<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    kind: LineKind,
    color: &'a str,
    stations: Vec<&'a str>,
    length_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<&'a ScheduleDescriptor>,
}

/// e.g. "weekdays 06:00-23:00 every 8 min (128 departures)"
fn service_hours(label: &str, day: &DaySchedule) -> String {
    format!(
        "{} {}-{} every {} min ({} departures)",
        label,
        day.start,
        day.end,
        day.headway_minutes,
        day.departures().count()
    )
}

fn print_json<T: Serialize>(rows: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

pub fn print_stations(stations: &[Arc<dyn TransitStation>], format: Format) -> Result<()> {
    let rows: Vec<StationRow> = stations
        .iter()
        .map(|s| StationRow::new(s.as_ref(), None))
        .collect();
    match format {
        Format::Json => print_json(&rows)?,
        Format::Text => rows.iter().for_each(|row| println!("{}", row.to_text())),
    }
    Ok(())
}

pub fn print_nearby(nearby: &[NearbyStation], format: Format) -> Result<()> {
    let rows: Vec<StationRow> = nearby
        .iter()
        .map(|n| StationRow::new(n.station.as_ref(), Some(n.distance_km)))
        .collect();
    match format {
        Format::Json => print_json(&rows)?,
        Format::Text => rows.iter().for_each(|row| println!("{}", row.to_text())),
    }
    Ok(())
}

pub fn print_lines(
    network: &StaticTransitProvider,
    lines: &[Arc<dyn TransitLine>],
    format: Format,
) -> Result<()> {
    let rows: Vec<LineRow> = lines
        .iter()
        .map(|line| LineRow {
            id: line.id().as_str(),
            name: line.name(),
            kind: line.kind(),
            color: line.color(),
            stations: line.station_ids().iter().map(|s| s.as_str()).collect(),
            length_km: network.line_length_km(line.id()),
            schedule: line.schedule(),
        })
        .collect();

    match format {
        Format::Json => print_json(&rows)?,
        Format::Text => {
            for row in &rows {
                let hours = row
                    .schedule
                    .map(|s| {
                        format!(
                            "{}, {}",
                            service_hours("weekdays", &s.weekday),
                            service_hours("weekends", &s.weekend)
                        )
                    })
                    .unwrap_or_else(|| "no timetable".to_string());
                println!(
                    "{:<4} {:<12} {:<8} {} stops, {:.1} km, {}",
                    row.id,
                    row.name,
                    row.kind,
                    row.stations.len(),
                    row.length_km.unwrap_or(0.0),
                    hours
                );
            }
        }
    }
    Ok(())
}
