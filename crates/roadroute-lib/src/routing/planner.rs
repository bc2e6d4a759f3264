//! Search strategies behind [`compute_route`](super::compute_route).
//!
//! Each planner wraps one search function from [`crate::path`]; the
//! orchestrator picks one with [`select_planner`] and never needs to know
//! which algorithm ran.

use crate::error::RouteError;
use crate::graph::{Graph, NodeId};
use crate::path::{find_route_bidirectional, find_route_dijkstra, PathConstraints, SearchOutcome};

use super::SearchAlgorithm;

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> SearchAlgorithm;

    /// Run the search between `origin` and `destination`.
    fn find_path(
        &self,
        graph: &Graph,
        origin: NodeId,
        destination: NodeId,
        constraints: &PathConstraints<'_>,
    ) -> Result<SearchOutcome, RouteError>;
}

/// Two frontiers meeting in the middle.
#[derive(Debug, Clone, Copy, Default)]
pub struct BidirectionalPlanner;

impl RoutePlanner for BidirectionalPlanner {
    fn algorithm(&self) -> SearchAlgorithm {
        SearchAlgorithm::Bidirectional
    }

    fn find_path(
        &self,
        graph: &Graph,
        origin: NodeId,
        destination: NodeId,
        constraints: &PathConstraints<'_>,
    ) -> Result<SearchOutcome, RouteError> {
        find_route_bidirectional(graph, origin, destination, constraints)
    }
}

/// Plain single-direction Dijkstra.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> SearchAlgorithm {
        SearchAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        graph: &Graph,
        origin: NodeId,
        destination: NodeId,
        constraints: &PathConstraints<'_>,
    ) -> Result<SearchOutcome, RouteError> {
        find_route_dijkstra(graph, origin, destination, constraints)
    }
}

/// Select the planner for `algorithm`.
pub fn select_planner(algorithm: SearchAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        SearchAlgorithm::Bidirectional => Box::new(BidirectionalPlanner),
        SearchAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
    }
}
