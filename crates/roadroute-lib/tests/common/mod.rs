//! Common test utilities and fixture helpers.
//!
//! Fixture node ids follow `docs/fixtures/nodes.csv`.

use std::path::PathBuf;

use roadroute_lib::{
    BorderConfig, BorderCrossing, CsvGraphSource, EdgeSpec, Graph, GraphProvider, NodeId,
};

#[allow(dead_code)]
pub const COTONOU: NodeId = 1;
#[allow(dead_code)]
pub const PORTO_NOVO: NodeId = 2;
#[allow(dead_code)]
pub const SEME_KRAKE: NodeId = 3;
#[allow(dead_code)]
pub const BADAGRY: NodeId = 4;
#[allow(dead_code)]
pub const LAGOS: NodeId = 5;
#[allow(dead_code)]
pub const LOME: NodeId = 8;
#[allow(dead_code)]
pub const PARAKOU: NodeId = 11;
#[allow(dead_code)]
pub const KANDI: NodeId = 12;
#[allow(dead_code)]
pub const MALANVILLE: NodeId = 13;
#[allow(dead_code)]
pub const UNLABELLED: NodeId = 16;

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Road network loaded from the CSV fixtures.
#[allow(dead_code)]
pub fn fixture_graph() -> Graph {
    CsvGraphSource::from_dir(&fixtures_dir())
        .load_graph()
        .expect("fixture graph loads")
}

/// One-way line A(1) -> B(2) -> C(3) -> D(4), one second and ten metres per edge.
#[allow(dead_code)]
pub fn line_graph() -> Graph {
    Graph::builder()
        .node(1, 6.40, 2.40, Some("BJ"))
        .node(2, 6.50, 2.40, Some("BJ"))
        .node(3, 6.60, 2.40, Some("BJ"))
        .node(4, 6.70, 2.40, Some("BJ"))
        .edge(EdgeSpec::with_time(1, 2, 10.0, 1.0))
        .edge(EdgeSpec::with_time(2, 3, 10.0, 1.0))
        .edge(EdgeSpec::with_time(3, 4, 10.0, 1.0))
        .build()
        .expect("valid graph")
}

/// Origin 1 and destination 4 joined by a northern branch through node 2
/// (latitude 10.0) and a southern branch through node 3 (latitude 9.0).
#[allow(dead_code)]
pub fn seasonal_graph(north_leg_s: f64, south_leg_s: f64) -> Graph {
    Graph::builder()
        .node(1, 9.0, 2.0, Some("BJ"))
        .node(2, 10.0, 2.5, Some("BJ"))
        .node(3, 9.0, 2.5, Some("BJ"))
        .node(4, 9.0, 3.0, Some("BJ"))
        .road(EdgeSpec::with_time(1, 2, 60_000.0, north_leg_s))
        .road(EdgeSpec::with_time(2, 4, 60_000.0, north_leg_s))
        .road(EdgeSpec::with_time(1, 3, 55_000.0, south_leg_s))
        .road(EdgeSpec::with_time(3, 4, 55_000.0, south_leg_s))
        .build()
        .expect("valid graph")
}

/// Border rule with a single crossing.
#[allow(dead_code)]
pub fn single_crossing(name: &str, lat: f64, lon: f64) -> BorderConfig {
    BorderConfig {
        crossings: vec![BorderCrossing::new(name, lat, lon)],
        ..BorderConfig::default()
    }
}
