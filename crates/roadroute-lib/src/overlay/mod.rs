//! Business rules layered on top of a computed path.
//!
//! Overlays never change the graph or the exclusion set. They read the
//! [`PathResult`] produced by the search and attach:
//!
//! - a rainy-season penalty for routes reaching the north ([`seasonal`]),
//! - border documents and the approach to the nearest border post
//!   ([`border`]),
//! - fare estimates per travel mode and a day-split suggestion ([`cost`]).

pub mod border;
pub mod config;
pub mod constants;
pub mod cost;
pub mod seasonal;

pub use border::{check_origin, nearest_crossing, BorderAnnotation};
pub use config::{
    BorderConfig, BorderCrossing, FareTable, OverlayConfig, Season, SeasonalConfig, SeasonalMode,
    TravelMode,
};
pub use cost::{estimate_costs, suggest_day_split};
pub use seasonal::{seasonal_penalty, SeasonalRegion};

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::graph::Graph;
use crate::metrics::PathResult;
use crate::path::PathConstraints;
use crate::routing::RoutePlanner;

/// Advisory raised by an overlay rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteWarning {
    /// Part of the route runs on roads degraded by the rainy season.
    DegradedRoad { penalty_s: f64 },
    /// The destination lies outside the home country.
    InternationalDestination { country_code: String },
}

/// Path plus every overlay annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRoute {
    pub path: PathResult,
    /// `path.time_s` plus any seasonal penalty.
    pub adjusted_time_s: f64,
    pub warnings: Vec<RouteWarning>,
    pub documents_required: bool,
    pub border: Option<BorderAnnotation>,
    /// Whole FCFA per travel mode.
    pub costs: BTreeMap<TravelMode, u64>,
    pub suggest_day_split: bool,
}

/// Search settings reused by overlays that need a follow-up query.
#[derive(Clone, Copy)]
pub struct OverlayContext<'a> {
    pub planner: &'a dyn RoutePlanner,
    pub constraints: PathConstraints<'a>,
}

/// Apply every overlay rule to `path`.
pub fn apply_overlays(
    graph: &Graph,
    path: PathResult,
    config: &OverlayConfig,
    context: &OverlayContext<'_>,
) -> Result<AnnotatedRoute> {
    let mut warnings = Vec::new();
    let mut adjusted_time_s = path.time_s;

    if let Some(penalty_s) = seasonal_penalty(graph, &path, config) {
        warn!(penalty_s, "route crosses rainy-season degraded roads");
        adjusted_time_s += penalty_s;
        warnings.push(RouteWarning::DegradedRoad { penalty_s });
    }

    let border = match &config.border {
        Some(rules) => border::detect_border(graph, &path, rules, context)?,
        None => None,
    };
    if let Some(annotation) = &border {
        warn!(
            country = %annotation.country_code,
            crossing = %annotation.crossing,
            "international destination"
        );
        warnings.push(RouteWarning::InternationalDestination {
            country_code: annotation.country_code.clone(),
        });
    }

    Ok(AnnotatedRoute {
        costs: estimate_costs(path.distance_m, &config.fares),
        suggest_day_split: suggest_day_split(adjusted_time_s, config.day_split_threshold_s),
        documents_required: border.is_some(),
        border,
        warnings,
        adjusted_time_s,
        path,
    })
}
