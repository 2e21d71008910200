//! R-tree nodes for spatial indexing.
//!
//! Wraps stations with their coordinates for proximity queries.
//!
//! ## Two-Stage Filtering
//!
//! 1. **R-tree filter**: a longitude/latitude envelope large enough to hold the
//!    whole search circle (see [`bounding_box_km`](super::queries::bounding_box_km))
//! 2. **Haversine filter**: the exact great-circle check on what remains
//!
//! The envelope only ever over-selects, so results match a full scan.

use std::sync::Arc;

use geo::Point;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::provider::static_provider::StationImpl;
use crate::spatial::queries::{bounding_box_km, haversine_km};

// ============================================================================
// Station Spatial Node
// ============================================================================

#[derive(Clone)]
pub struct StationNode {
    pub station: Arc<StationImpl>,
    /// Position in the station table, used to keep ties in table order
    pub order: usize,
    point: [f64; 2],
}

impl StationNode {
    pub fn new(order: usize, station: Arc<StationImpl>) -> Self {
        let location = station.location;
        Self {
            station,
            order,
            point: [location.x(), location.y()],
        }
    }
}

impl RTreeObject for StationNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StationNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ============================================================================
// Station Index
// ============================================================================

/// Station R-tree answering radius queries in kilometers
#[derive(Clone)]
pub struct StationIndex {
    tree: RTree<StationNode>,
}

impl StationIndex {
    pub fn new(stations: &[Arc<StationImpl>]) -> Self {
        let nodes = stations
            .iter()
            .enumerate()
            .map(|(order, s)| StationNode::new(order, s.clone()))
            .collect();

        Self {
            tree: RTree::bulk_load(nodes),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stations within `radius_km` of `point` with their distance, nearest
    /// first and ties in table order.
    pub fn within_km(&self, point: Point, radius_km: f64) -> Vec<(&StationNode, f64)> {
        if radius_km.is_nan() || radius_km < 0.0 {
            return Vec::new();
        }

        let candidates: Vec<&StationNode> = match bounding_box_km(point, radius_km) {
            Some((min, max)) => self
                .tree
                .locate_in_envelope(&AABB::from_corners(min, max))
                .collect(),
            None => self.tree.iter().collect(),
        };

        let mut hits: Vec<(&StationNode, f64)> = candidates
            .into_iter()
            .map(|node| (node, haversine_km(point, node.station.location)))
            .filter(|(_, distance)| *distance <= radius_km)
            .collect();

        hits.sort_by(|(a, da), (b, db)| da.total_cmp(db).then(a.order.cmp(&b.order)));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::*;
    use crate::models::types::StationKind;

    fn station(id: &str, lon: f64, lat: f64) -> Arc<StationImpl> {
        Arc::new(StationImpl {
            id: StationIdentifier::new(id),
            name: id.into(),
            location: Point::new(lon, lat),
            lines: vec![LineIdentifier::new("T1")],
            kind: StationKind::Tramway,
            zone: "1".into(),
            address: None,
        })
    }

    #[test]
    fn test_within_km_orders_and_filters() {
        let stations = vec![
            station("far", -7.50, 33.57),
            station("near", -7.589, 33.5731),
            station("here", -7.5898, 33.5731),
        ];
        let index = StationIndex::new(&stations);
        assert_eq!(index.len(), 3);

        let hits = index.within_km(Point::new(-7.5898, 33.5731), 1.0);
        let ids: Vec<&str> = hits.iter().map(|(n, _)| n.station.id.as_str()).collect();
        assert_eq!(ids, vec!["here", "near"]);
        assert_eq!(hits[0].1, 0.0);
    }

    #[test]
    fn test_ties_keep_table_order() {
        let stations = vec![
            station("b", -7.59, 33.58),
            station("a", -7.59, 33.58),
        ];
        let index = StationIndex::new(&stations);

        let hits = index.within_km(Point::new(-7.59, 33.58), 0.5);
        let ids: Vec<&str> = hits.iter().map(|(n, _)| n.station.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_degenerate_queries() {
        let index = StationIndex::new(&[station("s", -7.59, 33.58)]);

        assert!(index.within_km(Point::new(-7.59, 33.58), -1.0).is_empty());
        assert!(index.within_km(Point::new(-7.59, 33.58), f64::NAN).is_empty());
        // Infinite radius falls back to a scan and finds everything
        assert_eq!(index.within_km(Point::new(100.0, -40.0), f64::INFINITY).len(), 1);
    }
}
