//! Place name resolution.
//!
//! Turning free text into a graph node is a collaborator of the engine, not
//! part of it. [`PlaceResolver`] is the seam; [`Gazetteer`] is an in-memory
//! implementation and [`SuffixRetry`] retries unmatched names with a country
//! suffix appended.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::graph::{Coordinate, Graph, NodeId};

/// Suffix appended by [`SuffixRetry::benin`].
pub const DEFAULT_SUFFIX: &str = "Benin";

/// Similarity below which a name is not offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Number of suggestions returned for an unknown name.
const MAX_SUGGESTIONS: usize = 3;

/// Outcome of resolving a place name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved { node: NodeId },
    /// The name matches several distinct nodes.
    Ambiguous { candidates: Vec<NodeId> },
    NotFound { suggestions: Vec<String> },
}

impl Resolution {
    /// Node for an unambiguous match.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Resolution::Resolved { node } => Some(*node),
            _ => None,
        }
    }
}

/// Resolves place names to graph nodes.
pub trait PlaceResolver {
    fn resolve(&self, query: &str) -> Resolution;
}

/// Named places snapped to graph nodes. Lookups ignore case and repeated
/// whitespace.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    places: BTreeMap<String, Place>,
}

#[derive(Debug, Clone)]
struct Place {
    name: String,
    nodes: Vec<NodeId>,
}

impl Gazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` for `node`. Registering one name for several nodes
    /// makes it ambiguous.
    pub fn insert(&mut self, name: &str, node: NodeId) {
        let place = self
            .places
            .entry(normalize(name))
            .or_insert_with(|| Place {
                name: name.trim().to_string(),
                nodes: Vec::new(),
            });
        if !place.nodes.contains(&node) {
            place.nodes.push(node);
            place.nodes.sort_unstable();
        }
    }

    /// Register `name` at the graph node nearest to `coordinate`.
    ///
    /// Returns the node used, or `None` for an empty graph.
    pub fn insert_at(&mut self, graph: &Graph, name: &str, coordinate: Coordinate) -> Option<NodeId> {
        let node = graph.nearest_node(coordinate)?;
        self.insert(name, node);
        Some(node)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Known names most similar to `query`, best first.
    pub fn fuzzy_matches(&self, query: &str, limit: usize) -> Vec<String> {
        let query = normalize(query);
        let mut scored: Vec<(f64, &str)> = self
            .places
            .iter()
            .map(|(key, place)| (strsim::jaro_winkler(&query, key), place.name.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

impl PlaceResolver for Gazetteer {
    fn resolve(&self, query: &str) -> Resolution {
        match self.places.get(&normalize(query)) {
            Some(place) if place.nodes.len() == 1 => Resolution::Resolved {
                node: place.nodes[0],
            },
            Some(place) => Resolution::Ambiguous {
                candidates: place.nodes.clone(),
            },
            None => Resolution::NotFound {
                suggestions: self.fuzzy_matches(query, MAX_SUGGESTIONS),
            },
        }
    }
}

/// Retries unmatched names as `"<query>, <suffix>"`.
#[derive(Debug, Clone)]
pub struct SuffixRetry<R> {
    inner: R,
    suffix: String,
}

impl<R: PlaceResolver> SuffixRetry<R> {
    pub fn new(inner: R, suffix: impl Into<String>) -> Self {
        Self {
            inner,
            suffix: suffix.into(),
        }
    }

    pub fn benin(inner: R) -> Self {
        Self::new(inner, DEFAULT_SUFFIX)
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: PlaceResolver> PlaceResolver for SuffixRetry<R> {
    fn resolve(&self, query: &str) -> Resolution {
        let first = self.inner.resolve(query);
        if !matches!(first, Resolution::NotFound { .. })
            || normalize(query).ends_with(&normalize(&self.suffix))
        {
            return first;
        }

        let retry_query = format!("{}, {}", query.trim(), self.suffix);
        debug!(query, retry = %retry_query, "retrying place lookup with suffix");
        match self.inner.resolve(&retry_query) {
            Resolution::NotFound { .. } => first,
            found => found,
        }
    }
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
