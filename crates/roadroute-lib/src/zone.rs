//! Avoid-zone masking.
//!
//! An [`ExclusionSet`] lists nodes the search must treat as absent for one
//! query. It is always passed explicitly; nothing in the library keeps a
//! process-wide avoid list.
//!
//! The set may contain the origin or destination of a query. The search
//! exempts both endpoints, so a route can still start or end inside a zone
//! the caller asked to avoid; only intermediate nodes are masked.

use std::collections::hash_set;
use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Coordinate, Graph, NodeId};

/// Per-query set of node identifiers treated as absent from the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExclusionSet {
    nodes: HashSet<NodeId>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId) -> bool {
        self.nodes.insert(node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Merge another zone into this one.
    pub fn union_with(&mut self, other: &ExclusionSet) {
        self.nodes.extend(other.nodes.iter().copied());
    }
}

impl FromIterator<NodeId> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl Extend<NodeId> for ExclusionSet {
    fn extend<I: IntoIterator<Item = NodeId>>(&mut self, iter: I) {
        self.nodes.extend(iter);
    }
}

impl IntoIterator for ExclusionSet {
    type Item = NodeId;
    type IntoIter = hash_set::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// Collect every node within `radius_km` great-circle distance of `center`.
///
/// Fails with [`Error::InvalidRadius`] for a negative or non-finite radius.
pub fn build_exclusion_set(
    graph: &Graph,
    center: Coordinate,
    radius_km: f64,
) -> Result<ExclusionSet> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(Error::InvalidRadius { radius_km });
    }

    let zone: ExclusionSet = graph
        .spatial_index()
        .within_radius(center, radius_km)
        .into_iter()
        .map(|(node, _distance)| node)
        .collect();

    debug!(
        lat = center.lat,
        lon = center.lon,
        radius_km,
        excluded = zone.len(),
        "built exclusion zone"
    );

    Ok(zone)
}
