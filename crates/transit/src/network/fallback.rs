//! Route estimation that degrades to a straight line when routing fails.

use geo::Point;

use crate::network::traits::{Geocoder, RoutePlanner, RouteSummary};
use crate::spatial::queries::haversine_km;

/// Minutes per kilometer assumed for a straight-line estimate
pub const STRAIGHT_LINE_MINUTES_PER_KM: f64 = 3.0;

#[derive(Clone, Debug, PartialEq)]
pub enum RouteEstimate {
    /// Answer from the routing service
    Routed(RouteSummary),
    /// Great-circle estimate used when the service is unavailable
    StraightLine { distance_km: f64, duration_minutes: u32 },
}

impl RouteEstimate {
    pub fn straight_line(from: Point, to: Point) -> Self {
        let distance_km = haversine_km(from, to);
        Self::StraightLine {
            distance_km,
            duration_minutes: (distance_km * STRAIGHT_LINE_MINUTES_PER_KM).round() as u32,
        }
    }

    pub fn distance_km(&self) -> f64 {
        match self {
            Self::Routed(summary) => summary.distance_km,
            Self::StraightLine { distance_km, .. } => *distance_km,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        match self {
            Self::Routed(summary) => summary.duration_minutes,
            Self::StraightLine { duration_minutes, .. } => *duration_minutes,
        }
    }

    pub fn is_estimate(&self) -> bool {
        matches!(self, Self::StraightLine { .. })
    }
}

/// Ask `planner` for a route, or estimate one if it fails
pub async fn plan_route(planner: &dyn RoutePlanner, from: Point, to: Point) -> RouteEstimate {
    match planner.route(from, to).await {
        Ok(summary) => RouteEstimate::Routed(summary),
        Err(err) => {
            tracing::warn!("routing failed, using straight line: {}", err);
            RouteEstimate::straight_line(from, to)
        }
    }
}

/// Geocode both addresses, then plan a route between them.
///
/// Returns `None` if either address cannot be located.
pub async fn plan_trip(
    geocoder: &dyn Geocoder,
    planner: &dyn RoutePlanner,
    departure: &str,
    destination: &str,
) -> Option<RouteEstimate> {
    let from = locate(geocoder, departure).await?;
    let to = locate(geocoder, destination).await?;
    Some(plan_route(planner, from, to).await)
}

async fn locate(geocoder: &dyn Geocoder, address: &str) -> Option<Point> {
    match geocoder.geocode(address).await {
        Ok(found) => found,
        Err(err) => {
            tracing::warn!("geocoding {:?} failed: {}", address, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{Result, TransitError};
    use futures::executor::block_on;
    use std::future::Future;
    use std::pin::Pin;

    struct Offline;

    impl RoutePlanner for Offline {
        fn route<'a>(
            &'a self,
            _from: Point,
            _to: Point,
        ) -> Pin<Box<dyn Future<Output = Result<RouteSummary>> + Send + 'a>> {
            Box::pin(async { Err(TransitError::RoutingUnavailable("offline".into())) })
        }
    }

    struct Fixed(RouteSummary);

    impl RoutePlanner for Fixed {
        fn route<'a>(
            &'a self,
            _from: Point,
            _to: Point,
        ) -> Pin<Box<dyn Future<Output = Result<RouteSummary>> + Send + 'a>> {
            let summary = self.0.clone();
            Box::pin(async move { Ok(summary) })
        }
    }

    struct Gazetteer;

    impl Geocoder for Gazetteer {
        fn geocode<'a>(
            &'a self,
            address: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Option<Point>>> + Send + 'a>> {
            Box::pin(async move {
                match address {
                    "Casa Port" => Ok(Some(Point::new(-7.6298, 33.5731))),
                    "Place Mohammed V" => Ok(Some(Point::new(-7.5898, 33.5731))),
                    "broken" => Err(TransitError::RoutingUnavailable("timeout".into())),
                    _ => Ok(None),
                }
            })
        }
    }

    #[test]
    fn test_routed_answer_is_kept() {
        let summary = RouteSummary {
            distance_km: 4.2,
            duration_minutes: 11,
            geometry: None,
        };
        let estimate = block_on(plan_route(
            &Fixed(summary.clone()),
            Point::new(-7.6298, 33.5731),
            Point::new(-7.5898, 33.5731),
        ));

        assert_eq!(estimate, RouteEstimate::Routed(summary));
        assert!(!estimate.is_estimate());
    }

    #[test]
    fn test_straight_line_fallback() {
        let from = Point::new(-7.6298, 33.5731);
        let to = Point::new(-7.5898, 33.5731);
        let estimate = block_on(plan_route(&Offline, from, to));

        assert!(estimate.is_estimate());
        assert_eq!(estimate.distance_km(), haversine_km(from, to));
        // ~3.7 km at 3 min/km
        assert_eq!(estimate.duration_minutes(), 11);
    }

    #[test]
    fn test_ten_km_takes_thirty_minutes() {
        // 10 km due north along the prime meridian
        let north = Point::new(0.0, (10.0 / crate::spatial::EARTH_RADIUS_KM).to_degrees());
        let estimate = RouteEstimate::straight_line(Point::new(0.0, 0.0), north);

        assert!((estimate.distance_km() - 10.0).abs() < 1e-9);
        assert_eq!(estimate.duration_minutes(), 30);
    }

    #[test]
    fn test_plan_trip() {
        let trip = block_on(plan_trip(&Gazetteer, &Offline, "Casa Port", "Place Mohammed V"));
        assert!(trip.is_some_and(|t| t.is_estimate()));

        assert!(block_on(plan_trip(&Gazetteer, &Offline, "Casa Port", "Atlantis")).is_none());
        assert!(block_on(plan_trip(&Gazetteer, &Offline, "broken", "Casa Port")).is_none());
    }
}
