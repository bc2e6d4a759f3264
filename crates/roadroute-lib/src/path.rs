use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RouteError;
use crate::graph::{Direction, Edge, EdgeId, Graph, NodeId, WeightKind};
use crate::zone::ExclusionSet;

/// Weight function applied to each edge at relaxation time.
///
/// Implementations must return a finite, non-negative value and depend only on
/// the edge, so that the forward and backward frontiers see the same weights.
pub trait EdgeWeight: Send + Sync {
    fn weight(&self, graph: &Graph, edge: &Edge, kind: WeightKind) -> f64;
}

/// Plain attribute weight (`length_m` or `travel_time_s`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseWeight;

impl EdgeWeight for BaseWeight {
    fn weight(&self, graph: &Graph, edge: &Edge, kind: WeightKind) -> f64 {
        graph.edge_weight(edge, kind)
    }
}

/// Resource limits for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Maximum number of nodes settled across both frontiers.
    pub max_settled: Option<usize>,
}

/// Constraints applied during pathfinding.
#[derive(Clone, Copy)]
pub struct PathConstraints<'a> {
    /// Edge attribute to minimise.
    pub weight_kind: WeightKind,
    /// Nodes that must not appear in the interior of the path.
    pub excluded: &'a ExclusionSet,
    /// Weight hook evaluated per relaxed edge.
    pub weight: &'a dyn EdgeWeight,
    pub limits: SearchLimits,
}

impl<'a> PathConstraints<'a> {
    pub fn new(weight_kind: WeightKind, excluded: &'a ExclusionSet) -> Self {
        Self {
            weight_kind,
            excluded,
            weight: &BaseWeight,
            limits: SearchLimits::default(),
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: &'a dyn EdgeWeight) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Endpoints are never masked, even when they lie in an exclusion zone.
    fn allows(&self, node: NodeId, origin: NodeId, destination: NodeId) -> bool {
        node == origin || node == destination || !self.excluded.contains(node)
    }

    fn edge_cost(&self, graph: &Graph, edge: &Edge) -> f64 {
        self.weight.weight(graph, edge, self.weight_kind)
    }

    fn check_budget(&self, settled: usize) -> Result<(), RouteError> {
        match self.limits.max_settled {
            Some(limit) if settled > limit => Err(RouteError::BudgetExhausted { settled }),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for PathConstraints<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathConstraints")
            .field("weight_kind", &self.weight_kind)
            .field("excluded", &self.excluded.len())
            .field("limits", &self.limits)
            .finish()
    }
}

/// Labels of one search direction.
#[derive(Debug, Clone)]
pub struct SearchState {
    direction: Direction,
    root: NodeId,
    costs: HashMap<NodeId, f64>,
    /// Neighbour one step closer to `root`, and the edge joining them.
    parents: HashMap<NodeId, (NodeId, EdgeId)>,
    settled: HashSet<NodeId>,
    frontier: BinaryHeap<QueueEntry>,
}

impl SearchState {
    fn new(direction: Direction, root: NodeId) -> Self {
        let mut frontier = BinaryHeap::new();
        frontier.push(QueueEntry::new(root, 0.0));
        Self {
            direction,
            root,
            costs: HashMap::from([(root, 0.0)]),
            parents: HashMap::new(),
            settled: HashSet::new(),
            frontier,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Origin for the forward state, destination for the backward state.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Best known cost from the root to `node`.
    pub fn cost(&self, node: NodeId) -> Option<f64> {
        self.costs.get(&node).copied()
    }

    pub fn parent(&self, node: NodeId) -> Option<(NodeId, EdgeId)> {
        self.parents.get(&node).copied()
    }

    pub fn is_settled(&self, node: NodeId) -> bool {
        self.settled.contains(&node)
    }

    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }

    /// Cost of the next node to settle, discarding stale heap entries.
    fn peek_cost(&mut self) -> Option<f64> {
        while let Some(entry) = self.frontier.peek() {
            let stale = self.settled.contains(&entry.node)
                || self
                    .costs
                    .get(&entry.node)
                    .is_some_and(|best| *best < entry.cost.0);
            if !stale {
                return Some(entry.cost.0);
            }
            self.frontier.pop();
        }
        None
    }

    /// Settle and return the cheapest unsettled node.
    fn pop(&mut self) -> Option<(NodeId, f64)> {
        self.peek_cost()?;
        let entry = self.frontier.pop()?;
        self.settled.insert(entry.node);
        Some((entry.node, entry.cost.0))
    }

    /// Record `cost` for `node` if it improves on the current label.
    fn relax(&mut self, node: NodeId, via: NodeId, edge: EdgeId, cost: f64) -> bool {
        if self.settled.contains(&node) {
            return false;
        }
        if cost < self.cost(node).unwrap_or(f64::INFINITY) {
            self.costs.insert(node, cost);
            self.parents.insert(node, (via, edge));
            self.frontier.push(QueueEntry::new(node, cost));
            return true;
        }
        false
    }

    /// Settle the next node and relax its edges. Returns the settled node and
    /// every node whose label improved.
    fn expand(
        &mut self,
        graph: &Graph,
        origin: NodeId,
        destination: NodeId,
        constraints: &PathConstraints<'_>,
    ) -> Option<(NodeId, Vec<(NodeId, f64)>)> {
        let (node, cost) = self.pop()?;
        let mut improved = Vec::new();

        for (next, edge) in graph.adjacent(node, self.direction) {
            if !constraints.allows(next, origin, destination) {
                continue;
            }
            let next_cost = cost + constraints.edge_cost(graph, edge);
            if self.relax(next, node, edge.id, next_cost) {
                improved.push((next, next_cost));
            }
        }

        Some((node, improved))
    }
}

/// Result of a successful search, before path reconstruction.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Node where the forward and backward halves join.
    pub meeting: NodeId,
    /// Total weight of the best path under the search's weight function.
    pub cost: f64,
    pub forward: SearchState,
    pub backward: SearchState,
}

impl SearchOutcome {
    pub fn origin(&self) -> NodeId {
        self.forward.root
    }

    pub fn destination(&self) -> NodeId {
        self.backward.root
    }

    /// Nodes settled across both directions.
    pub fn settled(&self) -> usize {
        self.forward.settled_count() + self.backward.settled_count()
    }
}

/// Reject queries that cannot be searched.
pub fn validate_endpoints(
    graph: &Graph,
    origin: NodeId,
    destination: NodeId,
) -> Result<(), RouteError> {
    if origin == destination {
        return Err(RouteError::SameEndpoint { node: origin });
    }
    for node in [origin, destination] {
        if !graph.contains(node) {
            return Err(RouteError::UnknownNode { node });
        }
    }
    Ok(())
}

/// Bidirectional Dijkstra between `origin` and `destination`.
///
/// Frontiers advance one node at a time, always on the side whose next key is
/// smaller (ties go forward). The search stops when a node has been settled by
/// both sides, when the two smallest frontier keys together reach the best
/// complete path seen so far, or when either frontier runs dry.
pub fn find_route_bidirectional(
    graph: &Graph,
    origin: NodeId,
    destination: NodeId,
    constraints: &PathConstraints<'_>,
) -> Result<SearchOutcome, RouteError> {
    validate_endpoints(graph, origin, destination)?;

    let mut forward = SearchState::new(Direction::Forward, origin);
    let mut backward = SearchState::new(Direction::Backward, destination);
    let mut best: Option<(NodeId, f64)> = None;

    loop {
        let (Some(top_forward), Some(top_backward)) = (forward.peek_cost(), backward.peek_cost())
        else {
            break;
        };
        if best.is_some_and(|(_, mu)| top_forward + top_backward >= mu) {
            break;
        }

        let (active, passive) = if top_forward <= top_backward {
            (&mut forward, &backward)
        } else {
            (&mut backward, &forward)
        };

        let Some((node, improved)) = active.expand(graph, origin, destination, constraints)
        else {
            break;
        };
        constraints.check_budget(active.settled_count() + passive.settled_count())?;

        for (next, cost) in improved {
            if let Some(other) = passive.cost(next) {
                let total = cost + other;
                if best.map_or(true, |(_, mu)| total < mu) {
                    best = Some((next, total));
                }
            }
        }

        if passive.is_settled(node) {
            break;
        }
    }

    let settled = forward.settled_count() + backward.settled_count();
    let Some((meeting, cost)) = best else {
        debug!(origin, destination, settled, "frontiers never met");
        return Err(RouteError::NoPath {
            origin,
            destination,
        });
    };

    debug!(origin, destination, meeting, cost, settled, "bidirectional search finished");
    Ok(SearchOutcome {
        meeting,
        cost,
        forward,
        backward,
    })
}

/// Single-direction Dijkstra from `origin` to `destination`.
///
/// The returned outcome meets at the destination with an empty backward state.
pub fn find_route_dijkstra(
    graph: &Graph,
    origin: NodeId,
    destination: NodeId,
    constraints: &PathConstraints<'_>,
) -> Result<SearchOutcome, RouteError> {
    validate_endpoints(graph, origin, destination)?;

    let mut forward = SearchState::new(Direction::Forward, origin);
    let backward = SearchState::new(Direction::Backward, destination);

    while forward.peek_cost().is_some() {
        if forward.frontier.peek().map(|entry| entry.node) == Some(destination) {
            break;
        }
        if forward
            .expand(graph, origin, destination, constraints)
            .is_none()
        {
            break;
        }
        constraints.check_budget(forward.settled_count())?;
    }

    let Some(cost) = forward.cost(destination) else {
        return Err(RouteError::NoPath {
            origin,
            destination,
        });
    };

    debug!(origin, destination, cost, settled = forward.settled_count(), "dijkstra finished");
    Ok(SearchOutcome {
        meeting: destination,
        cost,
        forward,
        backward,
    })
}

/// Node and edge sequence of a reconstructed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePath {
    pub nodes: Vec<NodeId>,
    /// `edges[i]` joins `nodes[i]` to `nodes[i + 1]`.
    pub edges: Vec<EdgeId>,
}

/// Join both halves of a search at the meeting node.
///
/// Fails with [`RouteError::BrokenChain`] if a parent pointer is missing (or
/// loops) before the corresponding endpoint is reached.
pub fn reconstruct_path(outcome: &SearchOutcome) -> Result<RoutePath, RouteError> {
    let (mut nodes, mut edges) = walk_to_root(&outcome.forward, outcome.meeting)?;
    nodes.reverse();
    edges.reverse();

    let (tail_nodes, tail_edges) = walk_to_root(&outcome.backward, outcome.meeting)?;
    nodes.extend(tail_nodes.into_iter().skip(1));
    edges.extend(tail_edges);

    Ok(RoutePath { nodes, edges })
}

/// Follow parent pointers from `start` to the state's root, inclusive.
fn walk_to_root(
    state: &SearchState,
    start: NodeId,
) -> Result<(Vec<NodeId>, Vec<EdgeId>), RouteError> {
    let mut nodes = vec![start];
    let mut edges = Vec::new();
    let mut current = start;

    while current != state.root {
        let (next, edge) = state
            .parent(current)
            .ok_or(RouteError::BrokenChain { node: current })?;
        if edges.len() > state.parents.len() {
            return Err(RouteError::BrokenChain { node: current });
        }
        nodes.push(next);
        edges.push(edge);
        current = next;
    }

    Ok((nodes, edges))
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
