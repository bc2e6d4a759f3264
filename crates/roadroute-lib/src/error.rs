use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// Convenient result alias for the roadroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input graph.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Invalid query or failed search.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// An overlay rule could not be evaluated.
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    /// Raised when a zone radius is negative or not a finite number.
    #[error("invalid zone radius {radius_km} km")]
    InvalidRadius { radius_km: f64 },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised while building a [`Graph`](crate::Graph).
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// An edge references a node that was never added.
    #[error("edge {source_node} -> {target_node} references unknown node {missing}")]
    DanglingReference {
        source_node: NodeId,
        target_node: NodeId,
        missing: NodeId,
    },

    /// The same node identifier was added twice.
    #[error("duplicate node identifier {id}")]
    DuplicateNode { id: NodeId },

    /// Edge weights must be finite and non-negative.
    #[error("edge {source_node} -> {target_node} has invalid {attribute}: {value}")]
    InvalidWeight {
        source_node: NodeId,
        target_node: NodeId,
        attribute: &'static str,
        value: f64,
    },

    /// Latitude or longitude out of range.
    #[error("node {id} has invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { id: NodeId, lat: f64, lon: f64 },

    /// Neither a travel time nor a usable speed was provided for an edge.
    #[error("edge {source_node} -> {target_node} has no travel time and no positive speed")]
    MissingTravelTime {
        source_node: NodeId,
        target_node: NodeId,
    },
}

/// Errors raised by route computation.
#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    /// Origin and destination are the same node.
    #[error("origin and destination are the same node ({node})")]
    SameEndpoint { node: NodeId },

    /// An endpoint is not part of the graph.
    #[error("node {node} is not part of the graph")]
    UnknownNode { node: NodeId },

    /// The frontiers never met.
    #[error("no path found between {origin} and {destination}")]
    NoPath { origin: NodeId, destination: NodeId },

    /// A parent pointer was missing during reconstruction.
    #[error("parent chain broken at node {node}")]
    BrokenChain { node: NodeId },

    /// A reconstructed edge does not exist in the graph.
    #[error("edge {edge} recorded during search is not part of the graph")]
    UnknownEdge { edge: EdgeId },

    /// The search settled more nodes than the configured budget allows.
    #[error("search budget exhausted after settling {settled} nodes")]
    BudgetExhausted { settled: usize },
}

/// Errors raised when an overlay rule cannot be evaluated.
#[derive(Debug, Error, PartialEq)]
pub enum OverlayError {
    /// Border detection is enabled but no crossings are configured.
    #[error("no border crossings configured")]
    NoBorderCrossings,

    /// The origin cannot reach the selected border crossing.
    #[error("border crossing {crossing} (node {node}) is unreachable from the origin")]
    CrossingUnreachable { crossing: String, node: NodeId },

    /// The origin lies outside the covered home country.
    #[error("origin node {node} is in {country}, outside home country {home}")]
    OriginOutsideHome {
        node: NodeId,
        country: String,
        home: String,
    },

    /// A configuration value is out of range.
    #[error("invalid overlay configuration: {message}")]
    InvalidConfig { message: String },
}
