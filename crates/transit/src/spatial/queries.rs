//! Spatial query utilities for distance calculations.
//!
//! Uses the Haversine formula on a sphere of radius 6371 km.

use geo::{LineString, Point};

/// Mean Earth radius used for every distance in this crate
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius used when a proximity search does not specify one
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 2.0;

/// Great-circle distance in kilometers between two (lon, lat) points.
///
/// Inputs are not range-checked.
pub fn haversine_km(p1: Point, p2: Point) -> f64 {
    let (lat1, lon1) = (p1.y(), p1.x());
    let (lat2, lon2) = (p2.y(), p2.x());

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Length of a path in kilometers, summed segment by segment
pub fn route_length_km(path: &LineString) -> f64 {
    path.lines()
        .map(|segment| haversine_km(segment.start.into(), segment.end.into()))
        .sum()
}

/// Bounding box `[min_lon, min_lat], [max_lon, max_lat]` holding every point
/// within `radius_km` of `center`.
///
/// Returns `None` when the box would reach a pole or cross the antimeridian,
/// or when the inputs are not usable; callers should scan everything instead.
pub fn bounding_box_km(center: Point, radius_km: f64) -> Option<([f64; 2], [f64; 2])> {
    let (lat, lon) = (center.y(), center.x());
    if !lat.is_finite() || !lon.is_finite() || !radius_km.is_finite() || radius_km < 0.0 {
        return None;
    }
    if lat.abs() > 90.0 || lon.abs() > 180.0 {
        return None;
    }

    // Angular radius, padded slightly so boundary points survive rounding
    let angular = radius_km / EARTH_RADIUS_KM * (1.0 + 1e-9) + 1e-12;
    if angular >= std::f64::consts::FRAC_PI_2 {
        return None;
    }

    let lat_rad = lat.to_radians();
    let min_lat = lat_rad - angular;
    let max_lat = lat_rad + angular;
    if min_lat <= -std::f64::consts::FRAC_PI_2 || max_lat >= std::f64::consts::FRAC_PI_2 {
        return None;
    }

    let d_lon = (angular.sin() / lat_rad.cos()).min(1.0).asin();
    let min_lon = lon.to_radians() - d_lon;
    let max_lon = lon.to_radians() + d_lon;
    if min_lon < -std::f64::consts::PI || max_lon > std::f64::consts::PI {
        return None;
    }

    Some((
        [min_lon.to_degrees(), min_lat.to_degrees()],
        [max_lon.to_degrees(), max_lat.to_degrees()],
    ))
}
