use tracing::debug;

use crate::error::RouteError;
use crate::graph::{Graph, NodeId, WeightKind};
use crate::metrics::PathResult;
use crate::path::PathConstraints;
use crate::routing::{search_path, RoutePlanner};
use crate::zone::ExclusionSet;

use super::config::{OverlayConfig, Season, SeasonalConfig, SeasonalMode};

/// Region north of the seasonal threshold, priced once per route.
///
/// A route pays the penalty as soon as any of its nodes lies in the region,
/// however often it enters. [`SeasonalRegion::route_around`] therefore weighs
/// the fastest route against the fastest route that stays out of the region,
/// which yields the smallest adjusted time exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalRegion {
    threshold_lat: f64,
    penalty_s: f64,
}

impl SeasonalRegion {
    pub fn new(config: &SeasonalConfig) -> Self {
        Self {
            threshold_lat: config.threshold_lat,
            penalty_s: config.penalty_s,
        }
    }

    /// Region to route around for a query, if the configuration asks for one.
    pub fn for_query(config: &OverlayConfig, weight_kind: WeightKind) -> Option<Self> {
        let active = config.season == Season::Rainy
            && config.seasonal.mode == SeasonalMode::SearchWeighted
            && weight_kind == WeightKind::Time;
        active.then(|| Self::new(&config.seasonal))
    }

    pub fn penalty_s(&self) -> f64 {
        self.penalty_s
    }

    pub fn contains(&self, graph: &Graph, node: NodeId) -> bool {
        graph
            .node(node)
            .is_some_and(|n| n.coordinate.lat > self.threshold_lat)
    }

    /// Whether any node of `nodes` lies in the region.
    pub fn touches(&self, graph: &Graph, nodes: &[NodeId]) -> bool {
        nodes.iter().any(|&node| self.contains(graph, node))
    }

    /// `excluded` plus every node in the region.
    pub fn avoiding(&self, graph: &Graph, excluded: &ExclusionSet) -> ExclusionSet {
        let mut avoided = excluded.clone();
        avoided.extend(
            graph
                .nodes()
                .filter(|node| node.coordinate.lat > self.threshold_lat)
                .map(|node| node.id),
        );
        avoided
    }

    /// Replace `fastest` by a route outside the region when that is no slower
    /// once the penalty is counted.
    ///
    /// `fastest` must be the best route under `constraints`. When an endpoint
    /// lies in the region every route pays, so `fastest` is kept.
    pub fn route_around(
        &self,
        graph: &Graph,
        planner: &dyn RoutePlanner,
        fastest: PathResult,
        constraints: &PathConstraints<'_>,
    ) -> Result<PathResult, RouteError> {
        let (Some(origin), Some(destination)) = (fastest.origin(), fastest.destination()) else {
            return Ok(fastest);
        };
        if !self.touches(graph, &fastest.nodes)
            || self.contains(graph, origin)
            || self.contains(graph, destination)
        {
            return Ok(fastest);
        }

        let avoided = self.avoiding(graph, constraints.excluded);
        let southern = PathConstraints {
            excluded: &avoided,
            ..*constraints
        };
        match search_path(graph, planner, origin, destination, &southern) {
            Ok(detour) if detour.time_s <= fastest.time_s + self.penalty_s => {
                debug!(
                    origin,
                    destination,
                    detour_s = detour.time_s,
                    fastest_s = fastest.time_s,
                    "routing around seasonal region"
                );
                Ok(detour)
            }
            Ok(_) | Err(RouteError::NoPath { .. }) => Ok(fastest),
            Err(err) => Err(err),
        }
    }
}

/// Penalty to add to the route's travel time, charged once when any node of
/// the path lies north of the threshold during the rainy season.
pub fn seasonal_penalty(graph: &Graph, path: &PathResult, config: &OverlayConfig) -> Option<f64> {
    if config.season != Season::Rainy {
        return None;
    }
    let threshold = config.seasonal.threshold_lat;
    path.nodes
        .iter()
        .filter_map(|&id| graph.node(id))
        .any(|node| node.coordinate.lat > threshold)
        .then_some(config.seasonal.penalty_s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeSpec;
    use crate::routing::BidirectionalPlanner;

    fn graph() -> Graph {
        Graph::builder()
            .node(1, 9.5, 2.0, Some("BJ"))
            .node(2, 9.8, 2.0, Some("BJ"))
            .node(3, 10.2, 2.0, Some("BJ"))
            .road(EdgeSpec::with_time(1, 2, 30_000.0, 1200.0))
            .road(EdgeSpec::with_time(2, 3, 45_000.0, 1800.0))
            .build()
            .expect("valid graph")
    }

    /// 1 -> 2 (north) -> 3 (south) -> 4 (north) -> 5 at 250 s per leg, plus a
    /// direct southern road 1 -> 5 taking `direct_s`.
    fn zigzag(direct_s: f64) -> Graph {
        Graph::builder()
            .node(1, 9.0, 2.0, Some("BJ"))
            .node(2, 10.0, 2.1, Some("BJ"))
            .node(3, 9.0, 2.2, Some("BJ"))
            .node(4, 10.0, 2.3, Some("BJ"))
            .node(5, 9.0, 2.4, Some("BJ"))
            .edge(EdgeSpec::with_time(1, 2, 10_000.0, 250.0))
            .edge(EdgeSpec::with_time(2, 3, 10_000.0, 250.0))
            .edge(EdgeSpec::with_time(3, 4, 10_000.0, 250.0))
            .edge(EdgeSpec::with_time(4, 5, 10_000.0, 250.0))
            .edge(EdgeSpec::with_time(1, 5, 40_000.0, direct_s))
            .build()
            .expect("valid graph")
    }

    fn fastest<'a>(
        graph: &Graph,
        excluded: &'a ExclusionSet,
        origin: NodeId,
        destination: NodeId,
    ) -> (PathResult, PathConstraints<'a>) {
        let constraints = PathConstraints::new(WeightKind::Time, excluded);
        let path = search_path(graph, &BidirectionalPlanner, origin, destination, &constraints)
            .expect("route exists");
        (path, constraints)
    }

    fn path(nodes: Vec<NodeId>) -> PathResult {
        PathResult {
            nodes,
            edges: Vec::new(),
            distance_m: 0.0,
            time_s: 0.0,
        }
    }

    #[test]
    fn penalty_requires_rainy_season_and_northern_node() {
        let graph = graph();
        let rainy = OverlayConfig::default().with_season(Season::Rainy);

        assert_eq!(seasonal_penalty(&graph, &path(vec![1, 2, 3]), &rainy), Some(1800.0));
        // 9.8 itself is not north of the threshold.
        assert_eq!(seasonal_penalty(&graph, &path(vec![1, 2]), &rainy), None);
        assert_eq!(
            seasonal_penalty(&graph, &path(vec![1, 2, 3]), &OverlayConfig::default()),
            None
        );
    }

    #[test]
    fn region_excludes_only_nodes_north_of_threshold() {
        let graph = graph();
        let region = SeasonalRegion::new(&SeasonalConfig::default());
        let excluded: ExclusionSet = [1].into_iter().collect();

        let avoided = region.avoiding(&graph, &excluded);
        assert!(avoided.contains(1));
        assert!(!avoided.contains(2));
        assert!(avoided.contains(3));
        assert_eq!(excluded.len(), 1);
        assert!(region.touches(&graph, &[1, 2, 3]));
        assert!(!region.touches(&graph, &[1, 2]));
    }

    #[test]
    fn repeated_entries_are_priced_once() {
        let graph = zigzag(3000.0);
        let excluded = ExclusionSet::new();
        let region = SeasonalRegion::new(&SeasonalConfig::default());

        let (route, constraints) = fastest(&graph, &excluded, 1, 5);
        assert_eq!(route.nodes, vec![1, 2, 3, 4, 5]);
        let chosen = region
            .route_around(&graph, &BidirectionalPlanner, route, &constraints)
            .unwrap();
        // 1000 s plus one penalty beats the 3000 s direct road.
        assert_eq!(chosen.nodes, vec![1, 2, 3, 4, 5]);
        assert_eq!(chosen.time_s + region.penalty_s(), 2800.0);
    }

    #[test]
    fn southern_detour_wins_when_no_slower_after_penalty() {
        let graph = zigzag(2800.0);
        let excluded = ExclusionSet::new();
        let region = SeasonalRegion::new(&SeasonalConfig::default());

        let (route, constraints) = fastest(&graph, &excluded, 1, 5);
        let chosen = region
            .route_around(&graph, &BidirectionalPlanner, route, &constraints)
            .unwrap();
        assert_eq!(chosen.nodes, vec![1, 5]);
        assert_eq!(chosen.time_s, 2800.0);
    }

    #[test]
    fn northern_endpoint_keeps_fastest_route() {
        let graph = zigzag(2800.0);
        let excluded = ExclusionSet::new();
        let region = SeasonalRegion::new(&SeasonalConfig::default());

        let (route, constraints) = fastest(&graph, &excluded, 1, 4);
        let chosen = region
            .route_around(&graph, &BidirectionalPlanner, route.clone(), &constraints)
            .unwrap();
        assert_eq!(chosen, route);
    }

    #[test]
    fn region_is_only_used_for_weighted_rainy_time_queries() {
        let rainy = OverlayConfig::default().with_season(Season::Rainy);
        assert!(SeasonalRegion::for_query(&rainy, WeightKind::Time).is_some());
        assert!(SeasonalRegion::for_query(&rainy, WeightKind::Distance).is_none());
        assert!(SeasonalRegion::for_query(&OverlayConfig::default(), WeightKind::Time).is_none());

        let annotate = rainy.with_seasonal_mode(SeasonalMode::AnnotateOnly);
        assert!(SeasonalRegion::for_query(&annotate, WeightKind::Time).is_none());
    }
}
