use anyhow::{Context, Result};
use myway_transit::{LineImpl, StaticTransitProvider, StationImpl};
use serde::Deserialize;
use std::path::Path;

/// Alternate network tables, same shape as the built-in ones
#[derive(Debug, Deserialize)]
pub struct NetworkFile {
    pub stations: Vec<StationImpl>,
    pub lines: Vec<LineImpl>,
}

/// Read a network from a JSON file.
///
/// With `strict`, tables with integrity problems are rejected instead of
/// loaded with warnings.
pub fn read_network(path: &Path, strict: bool) -> Result<StaticTransitProvider> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read network file {}", path.display()))?;
    let file: NetworkFile = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse network file {}", path.display()))?;

    log::info!(
        "Loaded {} stations and {} lines from {}",
        file.stations.len(),
        file.lines.len(),
        path.display()
    );

    if strict {
        StaticTransitProvider::try_from_data(file.stations, file.lines)
            .with_context(|| format!("Network file {} failed validation", path.display()))
    } else {
        Ok(StaticTransitProvider::from_data(file.stations, file.lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use myway_transit::prelude::*;
    use std::io::Write;

    const NETWORK: &str = r##"{
        "stations": [
            { "id": "a", "name": "Alpha", "coordinates": [33.57, -7.60], "lines": ["L1"], "type": "tramway", "zone": "1" },
            { "id": "b", "name": "Beta", "coordinates": [33.57, -7.59], "lines": ["L1"], "type": "tramway", "zone": "1" }
        ],
        "lines": [
            { "id": "L1", "name": "Line 1", "type": "tramway", "color": "#123456", "stations": ["a", "b", "ghost"] }
        ]
    }"##;

    fn write_network() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(NETWORK.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_network_lenient() {
        let file = write_network();
        let network = read_network(file.path(), false).unwrap();

        assert_eq!(network.station_count(), 2);
        assert_eq!(network.stations_on_line(&LineIdentifier::new("L1")).len(), 2);
        assert_eq!(network.line_schedule(&LineIdentifier::new("L1")), None);
    }

    #[test]
    fn test_read_network_strict() {
        let file = write_network();
        let err = read_network(file.path(), true).err().unwrap();
        assert!(format!("{:#}", err).contains("unknown station ghost"));
    }

    #[test]
    fn test_read_missing_file() {
        assert!(read_network(Path::new("/definitely/not/here.json"), false).is_err());
    }
}
