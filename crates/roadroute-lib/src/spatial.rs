//! Great-circle geometry and a KD-tree over graph nodes.
//!
//! Nodes are projected onto a sphere of the mean Earth radius so that the
//! straight-line (chord) distance between two projected points grows
//! monotonically with their great-circle distance. Radius queries therefore
//! run against the KD-tree with the chord matching the requested arc, and the
//! candidates are then filtered exactly with the haversine formula.
//!
//! # Example
//!
//! ```
//! use roadroute_lib::{Coordinate, Graph};
//!
//! let graph = Graph::builder()
//!     .node(1, 6.3703, 2.3912, Some("BJ"))
//!     .node(2, 9.3400, 2.6300, Some("BJ"))
//!     .build()
//!     .unwrap();
//! let hits = graph
//!     .spatial_index()
//!     .within_radius(Coordinate::new(6.37, 2.39), 5.0);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].0, 1);
//! ```

use std::fmt;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

use crate::graph::{Coordinate, Node, NodeId};

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Relative slack applied to the chord bound so boundary points survive
/// floating-point rounding before the exact haversine filter.
const CHORD_SLACK: f64 = 1e-9;

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_KM * c
}

fn to_sphere(coordinate: Coordinate) -> [f64; 3] {
    let lat = coordinate.lat.to_radians();
    let lon = coordinate.lon.to_radians();
    [
        EARTH_RADIUS_KM * lat.cos() * lon.cos(),
        EARTH_RADIUS_KM * lat.cos() * lon.sin(),
        EARTH_RADIUS_KM * lat.sin(),
    ]
}

/// Chord length subtending a great-circle arc of `arc_km`.
fn chord_for_arc(arc_km: f64) -> f64 {
    let half_angle = (arc_km / (2.0 * EARTH_RADIUS_KM)).min(std::f64::consts::FRAC_PI_2);
    2.0 * EARTH_RADIUS_KM * half_angle.sin()
}

/// Spatial index over the nodes of one graph.
pub struct NodeIndex {
    /// Items are positions in `ids`/`coordinates`.
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    ids: Vec<NodeId>,
    coordinates: Vec<Coordinate>,
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeIndex")
            .field("len", &self.ids.len())
            .finish()
    }
}

impl NodeIndex {
    /// Build an index over `nodes`.
    ///
    /// Nodes are inserted in ascending id order so the tree layout does not
    /// depend on hash-map iteration order.
    pub fn build<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut sorted: Vec<&Node> = nodes.into_iter().collect();
        sorted.sort_unstable_by_key(|node| node.id);

        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        let mut ids = Vec::with_capacity(sorted.len());
        let mut coordinates = Vec::with_capacity(sorted.len());

        for (index, node) in sorted.into_iter().enumerate() {
            tree.add(&to_sphere(node.coordinate), index);
            ids.push(node.id);
            coordinates.push(node.coordinate);
        }

        debug!(node_count = ids.len(), "built node spatial index");

        Self {
            tree,
            ids,
            coordinates,
        }
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Nearest node to `point` and its great-circle distance in kilometres.
    pub fn nearest(&self, point: Coordinate) -> Option<(NodeId, f64)> {
        if self.ids.is_empty() {
            return None;
        }

        let neighbour = self
            .tree
            .nearest_n::<SquaredEuclidean>(&to_sphere(point), 1)
            .into_iter()
            .next()?;
        let index = neighbour.item;
        Some((
            self.ids[index],
            haversine_km(point, self.coordinates[index]),
        ))
    }

    /// All nodes within `radius_km` great-circle distance of `center`.
    ///
    /// Returns (NodeId, distance_km) pairs sorted by distance, then id.
    pub fn within_radius(&self, center: Coordinate, radius_km: f64) -> Vec<(NodeId, f64)> {
        if radius_km < 0.0 || !radius_km.is_finite() || self.ids.is_empty() {
            return Vec::new();
        }

        let chord = chord_for_arc(radius_km);
        let squared = chord * chord * (1.0 + CHORD_SLACK) + CHORD_SLACK;
        let candidates = self
            .tree
            .within::<SquaredEuclidean>(&to_sphere(center), squared);

        let mut hits: Vec<(NodeId, f64)> = candidates
            .into_iter()
            .filter_map(|neighbour| {
                let index = neighbour.item;
                let distance = haversine_km(center, self.coordinates[index]);
                (distance <= radius_km).then_some((self.ids[index], distance))
            })
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COTONOU: Coordinate = Coordinate {
        lat: 6.3703,
        lon: 2.3912,
    };
    const PARAKOU: Coordinate = Coordinate {
        lat: 9.3372,
        lon: 2.6303,
    };

    fn node(id: NodeId, lat: f64, lon: f64) -> Node {
        Node {
            id,
            coordinate: Coordinate::new(lat, lon),
            country_code: None,
        }
    }

    #[test]
    fn haversine_matches_known_distance() {
        let d = haversine_km(COTONOU, PARAKOU);
        assert!((d - 330.9).abs() < 2.0, "got {d}");
        assert_eq!(haversine_km(COTONOU, COTONOU), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn radius_query_uses_great_circle_distance() {
        // At 60 degrees north one degree of longitude is roughly 55.6 km,
        // which a planar lat/lon check would overestimate as ~111 km.
        let nodes = [node(1, 60.0, 0.0), node(2, 60.0, 1.0), node(3, 61.0, 0.0)];
        let index = NodeIndex::build(nodes.iter());

        let hits = index.within_radius(Coordinate::new(60.0, 0.0), 60.0);
        let ids: Vec<_> = hits.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(hits[1].1 > 55.0 && hits[1].1 < 56.0);
    }

    #[test]
    fn negative_radius_yields_nothing() {
        let nodes = [node(1, 0.0, 0.0)];
        let index = NodeIndex::build(nodes.iter());
        assert!(index.within_radius(Coordinate::new(0.0, 0.0), -1.0).is_empty());
    }

    #[test]
    fn nearest_on_empty_index_is_none() {
        let index = NodeIndex::build(std::iter::empty::<&Node>());
        assert!(index.is_empty());
        assert_eq!(index.nearest(COTONOU), None);
    }

    #[test]
    fn nearest_reports_distance() {
        let nodes = [node(1, 6.37, 2.39), node(2, 9.34, 2.63)];
        let index = NodeIndex::build(nodes.iter());
        let (id, distance) = index.nearest(Coordinate::new(9.0, 2.6)).unwrap();
        assert_eq!(id, 2);
        assert!(distance > 30.0 && distance < 45.0);
    }
}
