use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use geo::Point;
use myway_transit::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

mod load;
mod output;
mod report;

use load::read_network;
use output::write_network_geojson;
use report::{print_lines, print_nearby, print_stations, Format};

#[derive(Parser, Debug)]
#[command(
    name = "myway",
    author,
    version,
    about = "Query the Casablanca tramway and bus network",
    long_about = "Looks up stations and lines, finds nearby stations, computes distances \
                  and tells when the next tram or bus leaves.\n\n\
                  Uses the built-in Casablanca network unless --network points to a JSON \
                  file with alternate station and line tables."
)]
struct Args {
    /// JSON file with alternate network tables
    #[arg(long, global = true, env = "MYWAY_NETWORK")]
    network: Option<PathBuf>,

    /// Refuse a network file with integrity problems
    #[arg(long, global = true)]
    strict: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stations, optionally only those of one line in stop order
    Stations {
        #[arg(long)]
        line: Option<String>,
    },
    /// List lines
    Lines,
    /// Show one station, by id or by name
    Station { station: String },
    /// Lines serving both stations
    Common { from: String, to: String },
    /// Stations reachable from a station without a transfer
    Destinations { station: String },
    /// Stations near a location, nearest first
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Search radius in kilometers
        #[arg(long, default_value_t = DEFAULT_SEARCH_RADIUS_KM)]
        radius: f64,
    },
    /// Great-circle distance in kilometers between two locations
    Distance {
        #[arg(allow_hyphen_values = true)]
        lat1: f64,
        #[arg(allow_hyphen_values = true)]
        lon1: f64,
        #[arg(allow_hyphen_values = true)]
        lat2: f64,
        #[arg(allow_hyphen_values = true)]
        lon2: f64,
    },
    /// Next departure of a line
    Next {
        line: String,
        /// Reference time as YYYY-MM-DDTHH:MM, defaults to now
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<NaiveDateTime>,
    },
    /// Search stations by name, address or line
    Search { query: String },
    /// Export stations and lines as GeoJSON
    Map {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Check the network tables for integrity problems
    Validate,
}

fn parse_timestamp(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM ({})", e))
}

/// Resolve a station given either its id or its display name
fn find_station(network: &StaticTransitProvider, key: &str) -> Result<Arc<dyn TransitStation>> {
    match network.require_station(&StationIdentifier::new(key)) {
        Ok(station) => Ok(station),
        Err(err) => network.get_station_by_name(key).ok_or_else(|| err.into()),
    }
}

fn find_line(network: &StaticTransitProvider, key: &str) -> Result<Arc<dyn TransitLine>> {
    Ok(network.require_line(&LineIdentifier::new(key))?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let loaded;
    let network: &StaticTransitProvider = match &args.network {
        Some(path) => {
            loaded = read_network(path, args.strict)?;
            &loaded
        }
        None => casablanca::network(),
    };

    let format = if args.json { Format::Json } else { Format::Text };

    match args.command {
        Command::Stations { line } => {
            let stations = match line {
                Some(line) => {
                    let line = find_line(network, &line)?;
                    network.stations_on_line(line.id())
                }
                None => network.all_stations(),
            };
            print_stations(&stations, format)?;
        }
        Command::Lines => {
            print_lines(network, &network.all_lines(), format)?;
        }
        Command::Station { station } => {
            let station = find_station(network, &station)?;
            print_stations(&[station], format)?;
        }
        Command::Common { from, to } => {
            let from = find_station(network, &from)?;
            let to = find_station(network, &to)?;
            let lines = network.common_lines(from.id(), to.id());
            if lines.is_empty() {
                log::info!("No line serves both {} and {}", from.name(), to.name());
            }
            print_lines(network, &lines, format)?;
        }
        Command::Destinations { station } => {
            let station = find_station(network, &station)?;
            print_stations(&network.destinations_from(station.id()), format)?;
        }
        Command::Nearest { lat, lon, radius } => {
            let nearby = network.nearest_stations(Point::new(lon, lat), radius);
            if nearby.is_empty() {
                log::info!("No station within {} km", radius);
            }
            print_nearby(&nearby, format)?;
        }
        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let km = haversine_km(Point::new(lon1, lat1), Point::new(lon2, lat2));
            match format {
                Format::Json => println!("{}", serde_json::json!({ "distance_km": km })),
                Format::Text => println!("{:.2} km", km),
            }
        }
        Command::Next { line, at } => {
            let line = find_line(network, &line)?;
            let now = at.unwrap_or_else(|| chrono::Local::now().naive_local());
            let departure = network.next_departure(line.id(), now);
            match format {
                Format::Json => println!("{}", serde_json::to_string(&departure)?),
                Format::Text => println!("{}: {}", line.name(), departure),
            }
        }
        Command::Search { query } => {
            print_stations(&network.search_stations(&query), format)?;
        }
        Command::Map { output } => {
            write_network_geojson(network, &output)?;
            log::info!("Wrote network map to {}", output.display());
        }
        Command::Validate => {
            let issues = network.integrity_issues();
            for issue in &issues {
                log::warn!("{}", issue);
            }
            if !issues.is_empty() {
                bail!("{} integrity problem(s) found", issues.len());
            }
            log::info!(
                "Network OK: {} stations, {} lines",
                network.station_count(),
                network.line_count()
            );
        }
    }

    Ok(())
}
