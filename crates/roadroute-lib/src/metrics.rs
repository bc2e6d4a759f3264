use serde::Serialize;

use crate::error::RouteError;
use crate::graph::{EdgeId, Graph, NodeId};
use crate::path::RoutePath;

/// Route before overlay adjustments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Node sequence from origin to destination.
    pub nodes: Vec<NodeId>,
    /// Edge used between each consecutive pair of `nodes`.
    pub edges: Vec<EdgeId>,
    pub distance_m: f64,
    pub time_s: f64,
}

impl PathResult {
    pub fn origin(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Sum distance and travel time over the exact edges recorded by the search.
///
/// Every edge must connect its pair of consecutive nodes; a mismatch means the
/// search state was corrupted and is reported as a broken chain.
pub fn aggregate(graph: &Graph, path: RoutePath) -> Result<PathResult, RouteError> {
    if path.edges.len() != path.nodes.len().saturating_sub(1) {
        let node = path.nodes.last().copied().unwrap_or_default();
        return Err(RouteError::BrokenChain { node });
    }

    let mut distance_m = 0.0;
    let mut time_s = 0.0;

    for (pair, &edge_id) in path.nodes.windows(2).zip(&path.edges) {
        let edge = graph
            .edge(edge_id)
            .ok_or(RouteError::UnknownEdge { edge: edge_id })?;
        if edge.source != pair[0] || edge.target != pair[1] {
            return Err(RouteError::BrokenChain { node: pair[1] });
        }
        distance_m += edge.length_m;
        time_s += edge.travel_time_s;
    }

    Ok(PathResult {
        nodes: path.nodes,
        edges: path.edges,
        distance_m,
        time_s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeSpec;

    fn parallel() -> Graph {
        Graph::builder()
            .node(1, 0.0, 0.0, None)
            .node(2, 0.0, 0.1, None)
            .node(3, 0.0, 0.2, None)
            .edge(EdgeSpec::with_time(1, 2, 1000.0, 90.0))
            .edge(EdgeSpec::with_time(1, 2, 1500.0, 60.0))
            .edge(EdgeSpec::with_time(2, 3, 250.5, 20.25))
            .build()
            .expect("valid graph")
    }

    #[test]
    fn sums_the_recorded_parallel_edge() {
        let graph = parallel();
        let result = aggregate(
            &graph,
            RoutePath {
                nodes: vec![1, 2, 3],
                edges: vec![1, 2],
            },
        )
        .unwrap();
        assert_eq!(result.distance_m, 1500.0 + 250.5);
        assert_eq!(result.time_s, 60.0 + 20.25);
        assert_eq!(result.hop_count(), 2);
    }

    #[test]
    fn single_node_path_has_zero_metrics() {
        let graph = parallel();
        let result = aggregate(
            &graph,
            RoutePath {
                nodes: vec![2],
                edges: vec![],
            },
        )
        .unwrap();
        assert_eq!(result.distance_m, 0.0);
        assert_eq!(result.time_s, 0.0);
        assert_eq!(result.origin(), Some(2));
        assert_eq!(result.destination(), Some(2));
    }

    #[test]
    fn mismatched_edge_is_rejected() {
        let graph = parallel();
        let err = aggregate(
            &graph,
            RoutePath {
                nodes: vec![1, 3],
                edges: vec![0],
            },
        )
        .unwrap_err();
        assert_eq!(err, RouteError::BrokenChain { node: 3 });

        let err = aggregate(
            &graph,
            RoutePath {
                nodes: vec![1, 2],
                edges: vec![42],
            },
        )
        .unwrap_err();
        assert_eq!(err, RouteError::UnknownEdge { edge: 42 });
    }
}
