//! Road routing library.
//!
//! This crate holds an immutable directed road graph, masks avoid-zones out of
//! it per query, finds shortest paths with a bidirectional Dijkstra search and
//! annotates the result with regional business rules (seasonal penalties,
//! border documents, fare estimates). Consumers should depend on the
//! functions exported here instead of reimplementing behavior.
//!
//! ```
//! use roadroute_lib::{
//!     build_exclusion_set, compute_route, Coordinate, EdgeSpec, Graph, OverlayConfig,
//!     WeightKind,
//! };
//!
//! let graph = Graph::builder()
//!     .node(1, 6.37, 2.39, Some("BJ"))
//!     .node(2, 6.45, 2.50, Some("BJ"))
//!     .node(3, 6.50, 2.60, Some("BJ"))
//!     .road(EdgeSpec::with_time(1, 2, 15_000.0, 900.0))
//!     .road(EdgeSpec::with_time(2, 3, 13_000.0, 800.0))
//!     .road(EdgeSpec::with_time(1, 3, 40_000.0, 2400.0))
//!     .build()
//!     .unwrap();
//!
//! let avoid = build_exclusion_set(&graph, Coordinate::new(6.45, 2.50), 3.0).unwrap();
//! let route = compute_route(&graph, 1, 3, WeightKind::Time, &avoid, &OverlayConfig::default())
//!     .unwrap();
//! assert_eq!(route.path.nodes, vec![1, 3]);
//! ```

#![deny(warnings)]

pub mod error;
pub mod graph;
pub mod metrics;
pub mod overlay;
pub mod path;
pub mod provider;
pub mod resolver;
pub mod routing;
pub mod spatial;
pub mod zone;

pub use error::{Error, GraphError, OverlayError, Result, RouteError};
pub use graph::{
    Coordinate, Direction, Edge, EdgeId, EdgeSpec, Graph, GraphBuilder, Node, NodeId, WeightKind,
};
pub use metrics::{aggregate, PathResult};
pub use overlay::{
    apply_overlays, AnnotatedRoute, BorderAnnotation, BorderConfig, BorderCrossing, FareTable,
    OverlayConfig, RouteWarning, Season, SeasonalConfig, SeasonalMode, SeasonalRegion,
    TravelMode,
};
pub use path::{
    find_route_bidirectional, find_route_dijkstra, reconstruct_path, BaseWeight, EdgeWeight,
    PathConstraints, RoutePath, SearchLimits, SearchOutcome,
};
pub use provider::{load_graph_from_readers, CsvGraphSource, GraphProvider};
pub use resolver::{Gazetteer, PlaceResolver, Resolution, SuffixRetry};
pub use routing::{compute_route, search_path, select_planner, RoutePlanner, SearchAlgorithm};
pub use spatial::{haversine_km, NodeIndex};
pub use zone::{build_exclusion_set, ExclusionSet};
