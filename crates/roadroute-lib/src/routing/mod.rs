//! Route orchestration.
//!
//! [`compute_route`] is the single entry point for a routing query. It
//! validates the query, picks the planner from the [`OverlayConfig`], runs the
//! search (rerouting around the rainy-season region when that is cheaper),
//! rebuilds the path with its exact edges, sums metrics and finally applies
//! the overlay rules.
//!
//! # Example
//!
//! ```
//! use roadroute_lib::{compute_route, EdgeSpec, ExclusionSet, Graph, OverlayConfig, WeightKind};
//!
//! let graph = Graph::builder()
//!     .node(1, 6.37, 2.39, Some("BJ"))
//!     .node(2, 6.50, 2.60, Some("BJ"))
//!     .road(EdgeSpec::with_speed(1, 2, 36_000.0, 72.0))
//!     .build()
//!     .unwrap();
//!
//! let route = compute_route(
//!     &graph,
//!     1,
//!     2,
//!     WeightKind::Time,
//!     &ExclusionSet::new(),
//!     &OverlayConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(route.path.nodes, vec![1, 2]);
//! assert_eq!(route.adjusted_time_s, 1800.0);
//! ```

mod planner;

pub use planner::{select_planner, BidirectionalPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, RouteError};
use crate::graph::{Graph, NodeId, WeightKind};
use crate::metrics::{aggregate, PathResult};
use crate::overlay::{
    apply_overlays, check_origin, AnnotatedRoute, OverlayConfig, OverlayContext, SeasonalRegion,
};
use crate::path::{reconstruct_path, validate_endpoints, PathConstraints};
use crate::zone::ExclusionSet;

/// Supported search algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    /// Bidirectional Dijkstra.
    #[default]
    Bidirectional,
    /// Single-direction Dijkstra.
    Dijkstra,
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SearchAlgorithm::Bidirectional => "bidirectional",
            SearchAlgorithm::Dijkstra => "dijkstra",
        };
        f.write_str(value)
    }
}

/// Search, reconstruct and aggregate one path.
pub fn search_path(
    graph: &Graph,
    planner: &dyn RoutePlanner,
    origin: NodeId,
    destination: NodeId,
    constraints: &PathConstraints<'_>,
) -> std::result::Result<PathResult, RouteError> {
    let outcome = planner.find_path(graph, origin, destination, constraints)?;
    debug!(
        algorithm = %planner.algorithm(),
        origin,
        destination,
        settled = outcome.settled(),
        "search complete"
    );
    let path = reconstruct_path(&outcome)?;
    aggregate(graph, path)
}

/// Compute an annotated route between two graph nodes.
///
/// Nodes in `exclusion_set` are avoided unless they are the origin or the
/// destination. The graph and the exclusion set are only read.
///
/// In the rainy season with [`SeasonalMode::SearchWeighted`], the chosen path
/// minimises travel time plus the seasonal penalty, charged once per route.
/// Nodes without a country code are exempt from the border rules.
///
/// [`SeasonalMode::SearchWeighted`]: crate::overlay::SeasonalMode::SearchWeighted
pub fn compute_route(
    graph: &Graph,
    origin: NodeId,
    destination: NodeId,
    weight_kind: WeightKind,
    exclusion_set: &ExclusionSet,
    overlay_config: &OverlayConfig,
) -> Result<AnnotatedRoute> {
    overlay_config.validate()?;
    validate_endpoints(graph, origin, destination)?;
    check_origin(graph, origin, overlay_config)?;

    let constraints =
        PathConstraints::new(weight_kind, exclusion_set).with_limits(overlay_config.limits);
    let planner = select_planner(overlay_config.algorithm);

    info!(
        origin,
        destination,
        ?weight_kind,
        algorithm = %planner.algorithm(),
        excluded = exclusion_set.len(),
        season = ?overlay_config.season,
        "computing route"
    );

    let mut path = search_path(graph, planner.as_ref(), origin, destination, &constraints)?;
    if let Some(region) = SeasonalRegion::for_query(overlay_config, weight_kind) {
        path = region.route_around(graph, planner.as_ref(), path, &constraints)?;
    }
    let context = OverlayContext {
        planner: planner.as_ref(),
        constraints,
    };
    let route = apply_overlays(graph, path, overlay_config, &context)?;

    info!(
        hops = route.path.hop_count(),
        distance_m = route.path.distance_m,
        adjusted_time_s = route.adjusted_time_s,
        warnings = route.warnings.len(),
        "route computed"
    );
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, OverlayError};
    use crate::graph::EdgeSpec;

    #[test]
    fn algorithm_display_matches_serde_names() {
        for algorithm in [SearchAlgorithm::Bidirectional, SearchAlgorithm::Dijkstra] {
            let json = serde_json::to_string(&algorithm).unwrap();
            assert_eq!(json, format!("\"{algorithm}\""));
        }
    }

    #[test]
    fn invalid_config_fails_before_search() {
        let graph = Graph::builder()
            .node(1, 6.4, 2.4, Some("BJ"))
            .node(2, 6.5, 2.4, Some("BJ"))
            .build()
            .expect("valid graph");
        let mut config = OverlayConfig::default();
        config.day_split_threshold_s = f64::NAN;

        let err = compute_route(&graph, 1, 2, WeightKind::Time, &ExclusionSet::new(), &config)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Overlay(OverlayError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn endpoints_are_checked_before_origin_coverage() {
        let graph = Graph::builder()
            .node(1, 6.4, 3.4, Some("NG"))
            .node(2, 6.5, 2.4, Some("BJ"))
            .road(EdgeSpec::with_time(1, 2, 1000.0, 60.0))
            .build()
            .expect("valid graph");
        let config = OverlayConfig::default();
        let excluded = ExclusionSet::new();

        let err = compute_route(&graph, 1, 1, WeightKind::Time, &excluded, &config).unwrap_err();
        assert!(matches!(err, Error::Route(RouteError::SameEndpoint { node: 1 })));

        let err = compute_route(&graph, 1, 2, WeightKind::Time, &excluded, &config).unwrap_err();
        assert!(matches!(
            err,
            Error::Overlay(OverlayError::OriginOutsideHome { node: 1, .. })
        ));
    }
}
