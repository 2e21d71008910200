use anyhow::{Context, Result};
use geo::LineString;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use myway_transit::prelude::*;
use std::path::Path;

fn properties(pairs: Vec<(&str, serde_json::Value)>) -> serde_json::Map<String, serde_json::Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn feature(value: Value, properties: serde_json::Map<String, serde_json::Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Station as a GeoJSON point
fn station_to_feature(station: &dyn TransitStation) -> Feature {
    let location = station.location();
    let lines: Vec<&str> = station.lines().iter().map(|l| l.as_str()).collect();

    feature(
        Value::Point(vec![location.x(), location.y()]),
        properties(vec![
            ("feature_type", serde_json::json!("station")),
            ("id", serde_json::json!(station.id().as_str())),
            ("name", serde_json::json!(station.name())),
            ("type", serde_json::json!(station.kind().as_str())),
            ("zone", serde_json::json!(station.zone())),
            ("lines", serde_json::json!(lines)),
        ]),
    )
}

/// Line as a GeoJSON line string through its stops
fn line_to_feature(line: &dyn TransitLine, path: &LineString) -> Feature {
    let coords: Vec<Vec<f64>> = path.coords().map(|c| vec![c.x, c.y]).collect();

    feature(
        Value::LineString(coords),
        properties(vec![
            ("feature_type", serde_json::json!("line")),
            ("id", serde_json::json!(line.id().as_str())),
            ("name", serde_json::json!(line.name())),
            ("type", serde_json::json!(line.kind().as_str())),
            ("color", serde_json::json!(line.color())),
        ]),
    )
}

/// Stations and lines of a network as one feature collection
pub fn network_to_geojson(network: &StaticTransitProvider) -> GeoJson {
    let mut features: Vec<Feature> = network
        .all_stations()
        .iter()
        .map(|s| station_to_feature(s.as_ref()))
        .collect();

    for line in network.all_lines() {
        if let Some(path) = network.line_geometry(line.id()) {
            features.push(line_to_feature(line.as_ref(), &path));
        }
    }

    GeoJson::from(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Write the network map to a GeoJSON file
pub fn write_network_geojson(network: &StaticTransitProvider, output_path: &Path) -> Result<()> {
    let geojson = network_to_geojson(network);
    let json_string = serde_json::to_string_pretty(&geojson)
        .context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(())
}
