//! Graph loading.
//!
//! The engine only sees a finished [`Graph`]; where it comes from is behind
//! [`GraphProvider`]. [`CsvGraphSource`] reads a pair of CSV files:
//!
//! - nodes: `id,lat,lon,country` (`country` may be empty or absent),
//! - edges: `source,target,length_m` plus `travel_time_s` and/or `speed_kph`,
//!   and an optional `two_way` column (`true` adds the reverse edge).
//!
//! Headers and fields are trimmed before parsing.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::graph::{Coordinate, EdgeSpec, Graph, GraphBuilder, NodeId};

/// Source of a road graph.
pub trait GraphProvider {
    fn load_graph(&self) -> Result<Graph>;
}

/// Node and edge CSV files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvGraphSource {
    pub nodes: PathBuf,
    pub edges: PathBuf,
}

impl CsvGraphSource {
    pub fn new(nodes: impl Into<PathBuf>, edges: impl Into<PathBuf>) -> Self {
        Self {
            nodes: nodes.into(),
            edges: edges.into(),
        }
    }

    /// Files named `nodes.csv` and `edges.csv` inside `dir`.
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(dir.join("nodes.csv"), dir.join("edges.csv"))
    }
}

impl GraphProvider for CsvGraphSource {
    fn load_graph(&self) -> Result<Graph> {
        let nodes = fs::File::open(&self.nodes)?;
        let edges = fs::File::open(&self.edges)?;
        let graph = load_graph_from_readers(nodes, edges)?;
        info!(
            nodes_path = %self.nodes.display(),
            edges_path = %self.edges.display(),
            "loaded road graph from csv"
        );
        Ok(graph)
    }
}

#[derive(Debug, Deserialize)]
struct NodeRow {
    id: NodeId,
    lat: f64,
    lon: f64,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeRow {
    source: NodeId,
    target: NodeId,
    length_m: f64,
    travel_time_s: Option<f64>,
    speed_kph: Option<f64>,
    two_way: Option<bool>,
}

impl EdgeRow {
    fn spec(&self) -> EdgeSpec {
        EdgeSpec {
            source: self.source,
            target: self.target,
            length_m: self.length_m,
            travel_time_s: self.travel_time_s,
            speed_kph: self.speed_kph,
        }
    }
}

/// Build a graph from node and edge CSV readers (e.g., files or in-memory
/// buffers).
pub fn load_graph_from_readers<N: Read, E: Read>(nodes: N, edges: E) -> Result<Graph> {
    let mut builder = GraphBuilder::default();

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(nodes);
    for row in reader.deserialize() {
        let row: NodeRow = row?;
        builder.push_node(
            row.id,
            Coordinate::new(row.lat, row.lon),
            row.country.as_deref(),
        );
    }

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(edges);
    for row in reader.deserialize() {
        let row: EdgeRow = row?;
        builder.push_edge(row.spec());
        if row.two_way.unwrap_or(false) {
            builder.push_edge(row.spec().reversed());
        }
    }

    Ok(builder.build()?)
}
