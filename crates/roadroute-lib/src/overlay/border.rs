use serde::Serialize;
use tracing::debug;

use crate::error::{OverlayError, Result, RouteError};
use crate::graph::{Coordinate, Graph, NodeId};
use crate::metrics::{aggregate, PathResult};
use crate::path::RoutePath;
use crate::routing::search_path;
use crate::spatial::haversine_km;

use super::config::{BorderConfig, BorderCrossing, OverlayConfig};
use super::OverlayContext;

/// Approach to the border post serving an international destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorderAnnotation {
    /// Country of the destination.
    pub country_code: String,
    /// Name of the selected crossing.
    pub crossing: String,
    /// Graph node the crossing was snapped to.
    pub node: NodeId,
    /// Nodes from the origin to `node`.
    pub sub_path: Vec<NodeId>,
    pub distance_m: f64,
    pub time_s: f64,
}

/// Reject origins outside the home country when the border rule asks for it.
///
/// Origins without a country code are not checked.
pub fn check_origin(graph: &Graph, origin: NodeId, config: &OverlayConfig) -> Result<()> {
    let Some(border) = config.border.as_ref().filter(|b| b.restrict_origin) else {
        return Ok(());
    };
    let Some(country) = country_of(graph, origin)? else {
        debug!(origin, "origin has no country code, skipping coverage check");
        return Ok(());
    };
    if border.is_home(country) {
        return Ok(());
    }
    Err(OverlayError::OriginOutsideHome {
        node: origin,
        country: country.to_string(),
        home: border.home_country.clone(),
    }
    .into())
}

/// Configured crossing closest to `point`. Ties keep the earlier entry.
pub fn nearest_crossing(point: Coordinate, crossings: &[BorderCrossing]) -> Option<&BorderCrossing> {
    crossings
        .iter()
        .map(|crossing| (crossing, haversine_km(point, crossing.coordinate)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(crossing, _)| crossing)
}

/// Annotate routes whose destination lies outside the home country.
pub(crate) fn detect_border(
    graph: &Graph,
    path: &PathResult,
    border: &BorderConfig,
    context: &OverlayContext<'_>,
) -> Result<Option<BorderAnnotation>> {
    let (Some(origin), Some(destination)) = (path.origin(), path.destination()) else {
        return Ok(None);
    };
    let Some(country_code) = country_of(graph, destination)? else {
        debug!(destination, "destination has no country code, no border annotation");
        return Ok(None);
    };
    if border.is_home(country_code) {
        return Ok(None);
    }
    let country_code = country_code.to_string();

    let target = graph
        .node(destination)
        .ok_or(RouteError::UnknownNode { node: destination })?
        .coordinate;
    let crossing =
        nearest_crossing(target, &border.crossings).ok_or(OverlayError::NoBorderCrossings)?;
    let node = graph
        .nearest_node(crossing.coordinate)
        .ok_or(OverlayError::NoBorderCrossings)?;

    let approach = match path.nodes.iter().position(|&n| n == node) {
        Some(index) => aggregate(
            graph,
            RoutePath {
                nodes: path.nodes[..=index].to_vec(),
                edges: path.edges[..index].to_vec(),
            },
        )?,
        None => match search_path(graph, context.planner, origin, node, &context.constraints) {
            Ok(approach) => approach,
            Err(RouteError::NoPath { .. }) => {
                return Err(OverlayError::CrossingUnreachable {
                    crossing: crossing.name.clone(),
                    node,
                }
                .into())
            }
            Err(err) => return Err(err.into()),
        },
    };

    debug!(
        crossing = %crossing.name,
        node,
        hops = approach.hop_count(),
        "resolved border approach"
    );

    Ok(Some(BorderAnnotation {
        country_code,
        crossing: crossing.name.clone(),
        node,
        sub_path: approach.nodes,
        distance_m: approach.distance_m,
        time_s: approach.time_s,
    }))
}

fn country_of(graph: &Graph, node: NodeId) -> Result<Option<&str>> {
    let entry = graph.node(node).ok_or(RouteError::UnknownNode { node })?;
    Ok(entry.country_code.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn nearest_crossing_uses_great_circle_distance() {
        let crossings = vec![
            BorderCrossing::new("West", 6.22, 1.66),
            BorderCrossing::new("East", 6.37, 2.71),
        ];
        let lagos = Coordinate::new(6.45, 3.39);
        assert_eq!(nearest_crossing(lagos, &crossings).unwrap().name, "East");
        let lome = Coordinate::new(6.13, 1.22);
        assert_eq!(nearest_crossing(lome, &crossings).unwrap().name, "West");
        assert!(nearest_crossing(lome, &[]).is_none());
    }

    #[test]
    fn origin_outside_home_is_rejected() {
        let graph = Graph::builder()
            .node(1, 6.4, 2.4, Some("bj"))
            .node(2, 6.4, 3.4, Some("NG"))
            .node(3, 6.5, 2.5, None)
            .build()
            .expect("valid graph");
        let config = OverlayConfig::default();

        assert!(check_origin(&graph, 1, &config).is_ok());
        assert!(matches!(
            check_origin(&graph, 2, &config),
            Err(Error::Overlay(OverlayError::OriginOutsideHome { node: 2, .. }))
        ));
        assert!(check_origin(&graph, 3, &config).is_ok());

        let relaxed = OverlayConfig::default().with_border(Some(BorderConfig {
            restrict_origin: false,
            ..BorderConfig::default()
        }));
        assert!(check_origin(&graph, 2, &relaxed).is_ok());
        assert!(check_origin(&graph, 2, &OverlayConfig::default().with_border(None)).is_ok());
    }
}
