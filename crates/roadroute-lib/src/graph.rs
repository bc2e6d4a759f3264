use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GraphError;
use crate::spatial::{haversine_km, NodeIndex};

/// Numeric identifier for a road-network node.
pub type NodeId = i64;

/// Index of an edge within its graph's edge table.
pub type EdgeId = usize;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another coordinate in kilometres.
    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_km(*self, *other)
    }

    fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Road-network node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub coordinate: Coordinate,
    /// ISO 3166-1 alpha-2 code, upper-cased at build time.
    pub country_code: Option<String>,
}

/// Directed edge within the routing graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub length_m: f64,
    pub travel_time_s: f64,
}

impl Edge {
    /// Raw attribute selected by `kind`.
    pub fn weight(&self, kind: WeightKind) -> f64 {
        match kind {
            WeightKind::Distance => self.length_m,
            WeightKind::Time => self.travel_time_s,
        }
    }
}

/// Edge attribute minimised by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightKind {
    /// Shortest route by `length_m`.
    Distance,
    /// Fastest route by `travel_time_s`.
    #[default]
    Time,
}

/// Traversal direction of an adjacency lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow outgoing edges.
    Forward,
    /// Follow incoming edges against their direction.
    Backward,
}

#[derive(Debug)]
struct GraphInner {
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
    outgoing: HashMap<NodeId, Vec<EdgeId>>,
    incoming: HashMap<NodeId, Vec<EdgeId>>,
    spatial: OnceCell<NodeIndex>,
}

/// Immutable road graph shared by route computations.
///
/// Cloning is cheap: clones share the same storage, so one loaded graph can be
/// handed to any number of concurrent queries.
#[derive(Debug, Clone)]
pub struct Graph {
    inner: Arc<GraphInner>,
}

impl Graph {
    /// Start building a new graph.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Lookup a node by identifier.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.inner.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.nodes.contains_key(&id)
    }

    /// Lookup an edge by identifier.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.inner.edges.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.inner.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.inner.edges
    }

    pub fn node_count(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edges.len()
    }

    /// Outgoing edges of `node`, paired with the node each edge leads to.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &Edge)> + '_ {
        self.adjacent(node, Direction::Forward)
    }

    /// Incoming edges of `node`, paired with the node each edge comes from.
    pub fn reverse_neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &Edge)> + '_ {
        self.adjacent(node, Direction::Backward)
    }

    /// Adjacency in the given direction. Parallel edges are yielded individually.
    pub fn adjacent(
        &self,
        node: NodeId,
        direction: Direction,
    ) -> impl Iterator<Item = (NodeId, &Edge)> + '_ {
        let index = match direction {
            Direction::Forward => &self.inner.outgoing,
            Direction::Backward => &self.inner.incoming,
        };
        index
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&id| {
                let edge = &self.inner.edges[id];
                let other = match direction {
                    Direction::Forward => edge.target,
                    Direction::Backward => edge.source,
                };
                (other, edge)
            })
    }

    /// Non-negative weight of `edge` for the requested kind.
    pub fn edge_weight(&self, edge: &Edge, kind: WeightKind) -> f64 {
        edge.weight(kind)
    }

    /// Spatial index over all nodes, built on first use.
    pub fn spatial_index(&self) -> &NodeIndex {
        self.inner
            .spatial
            .get_or_init(|| NodeIndex::build(self.inner.nodes.values()))
    }

    /// Closest node to `coordinate` by great-circle distance.
    pub fn nearest_node(&self, coordinate: Coordinate) -> Option<NodeId> {
        self.spatial_index()
            .nearest(coordinate)
            .map(|(node, _distance_km)| node)
    }
}

/// Edge description accepted by [`GraphBuilder`].
///
/// Travel time is either given directly or derived from `length_m` and a speed
/// in km/h. A direct travel time takes precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub source: NodeId,
    pub target: NodeId,
    pub length_m: f64,
    pub travel_time_s: Option<f64>,
    pub speed_kph: Option<f64>,
}

impl EdgeSpec {
    pub fn with_time(source: NodeId, target: NodeId, length_m: f64, travel_time_s: f64) -> Self {
        Self {
            source,
            target,
            length_m,
            travel_time_s: Some(travel_time_s),
            speed_kph: None,
        }
    }

    pub fn with_speed(source: NodeId, target: NodeId, length_m: f64, speed_kph: f64) -> Self {
        Self {
            source,
            target,
            length_m,
            travel_time_s: None,
            speed_kph: Some(speed_kph),
        }
    }

    /// Same edge in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
            ..self.clone()
        }
    }

    fn resolve_travel_time(&self) -> Result<f64, GraphError> {
        if let Some(time) = self.travel_time_s {
            return Ok(time);
        }
        match self.speed_kph {
            Some(speed) if speed.is_finite() && speed > 0.0 => Ok(self.length_m / (speed / 3.6)),
            _ => Err(GraphError::MissingTravelTime {
                source_node: self.source,
                target_node: self.target,
            }),
        }
    }
}

/// Accumulates nodes and edges and validates them into a [`Graph`].
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<EdgeSpec>,
}

impl GraphBuilder {
    pub fn push_node(&mut self, id: NodeId, coordinate: Coordinate, country_code: Option<&str>) {
        let country_code = country_code
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_ascii_uppercase);
        self.nodes.push(Node {
            id,
            coordinate,
            country_code,
        });
    }

    pub fn push_edge(&mut self, spec: EdgeSpec) {
        self.edges.push(spec);
    }

    /// Chainable variant of [`push_node`](Self::push_node).
    #[must_use]
    pub fn node(mut self, id: NodeId, lat: f64, lon: f64, country_code: Option<&str>) -> Self {
        self.push_node(id, Coordinate::new(lat, lon), country_code);
        self
    }

    /// Chainable variant of [`push_edge`](Self::push_edge).
    #[must_use]
    pub fn edge(mut self, spec: EdgeSpec) -> Self {
        self.push_edge(spec);
        self
    }

    /// Add `spec` and its mirror image, as for a two-way road.
    #[must_use]
    pub fn road(mut self, spec: EdgeSpec) -> Self {
        self.push_edge(spec.reversed());
        self.push_edge(spec);
        self
    }

    /// Validate and freeze the graph.
    pub fn build(self) -> Result<Graph, GraphError> {
        let mut nodes = HashMap::with_capacity(self.nodes.len());
        for node in self.nodes {
            if !node.coordinate.is_valid() {
                return Err(GraphError::InvalidCoordinate {
                    id: node.id,
                    lat: node.coordinate.lat,
                    lon: node.coordinate.lon,
                });
            }
            if nodes.contains_key(&node.id) {
                return Err(GraphError::DuplicateNode { id: node.id });
            }
            nodes.insert(node.id, node);
        }

        let mut edges = Vec::with_capacity(self.edges.len());
        let mut outgoing: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();
        let mut incoming: HashMap<NodeId, Vec<EdgeId>> = HashMap::new();

        for spec in self.edges {
            for endpoint in [spec.source, spec.target] {
                if !nodes.contains_key(&endpoint) {
                    return Err(GraphError::DanglingReference {
                        source_node: spec.source,
                        target_node: spec.target,
                        missing: endpoint,
                    });
                }
            }

            let travel_time_s = spec.resolve_travel_time()?;
            for (attribute, value) in [("length_m", spec.length_m), ("travel_time_s", travel_time_s)]
            {
                if !value.is_finite() || value < 0.0 {
                    return Err(GraphError::InvalidWeight {
                        source_node: spec.source,
                        target_node: spec.target,
                        attribute,
                        value,
                    });
                }
            }

            let id = edges.len();
            outgoing.entry(spec.source).or_default().push(id);
            incoming.entry(spec.target).or_default().push(id);
            edges.push(Edge {
                id,
                source: spec.source,
                target: spec.target,
                length_m: spec.length_m,
                travel_time_s,
            });
        }

        let countries: HashSet<&str> = nodes
            .values()
            .filter_map(|node| node.country_code.as_deref())
            .collect();
        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            countries = countries.len(),
            "built road graph"
        );

        Ok(Graph {
            inner: Arc::new(GraphInner {
                nodes,
                edges,
                outgoing,
                incoming,
                spatial: OnceCell::new(),
            }),
        })
    }
}
