//! Airnet is a small toolkit for analysing national air-route networks built from the
//! OpenFlights airport and route tables.
//!
//! # Basic usage
//!
//! The library is centered around the [`Graph`](graph::Graph) structure. A
//! [`Network`](builder::Network) pairs the directed route graph of one country with the
//! attributes of its airports. Once built, degrees, centralities, communities, shortest paths
//! and the effect of removing airports can be computed on it.
//!
//! ```rust
//! use airnet::{
//!     build_graph,
//!     centrality::CentralityConfig,
//!     centrality_table,
//!     dataset::Dataset,
//!     path::PathOutcome,
//!     robustness_metrics,
//!     shortest_path,
//! };
//!
//! let airports = "\
//! 1,\"Guarulhos\",\"Sao Paulo\",\"Brazil\",\"GRU\",\"SBGR\",-23.43,-46.47,2459,-3,\"S\",\\N,\"airport\",\"OurAirports\"
//! 2,\"Brasilia\",\"Brasilia\",\"Brazil\",\"BSB\",\"SBBR\",-15.87,-47.92,3497,-3,\"S\",\\N,\"airport\",\"OurAirports\"
//! 3,\"Manaus\",\"Manaus\",\"Brazil\",\"MAO\",\"SBEG\",-3.04,-60.05,264,-4,\"S\",\\N,\"airport\",\"OurAirports\"
//! ";
//! let routes = "\
//! G3,1,GRU,1,BSB,2,,0,738
//! G3,1,BSB,2,MAO,3,,0,738
//! AD,2,MAO,3,\\N,\\N,,0,E95
//! ";
//!
//! // Parse the raw tables and build the network of Brazilian airports.
//! let dataset = Dataset::from_readers(airports.as_bytes(), routes.as_bytes()).unwrap();
//! let network = build_graph(&dataset.airports, &dataset.routes, "Brazil");
//!
//! // The route with a missing destination was dropped.
//! assert_eq!(network.graph.edge_count(), 2);
//!
//! // Compute some metrics on the network.
//! let table = centrality_table(&network.graph, &CentralityConfig::default());
//! assert_eq!(table.records.len(), 3);
//!
//! assert_eq!(
//!     shortest_path(&network.graph, 1, 3).unwrap(),
//!     PathOutcome::Found(vec![1, 2, 3])
//! );
//! assert_eq!(robustness_metrics(&network.graph).largest_component, 3);
//! ```

/// Builds a directed graph from one or more vertex paths, `graph!([a, b, c], [c, d])`.
#[cfg(test)]
macro_rules! graph {
    ($($path:expr),*) => {{
        let mut graph = $crate::graph::Graph::new();

        $(
            let mut iter = $path.into_iter().peekable();
            while let (Some(a), Some(b)) = (iter.next(), iter.peek()) {
                graph.insert($crate::edge::Edge::new(a, *b));
            }
        )*

        graph
    }}
}

mod betweenness;
pub mod builder;
pub mod centrality;
mod closeness;
mod clustering;
pub mod components;
pub mod config;
pub mod dataset;
pub mod degree;
pub mod edge;
mod eigenvector;
pub mod error;
pub mod graph;
pub mod louvain;
pub mod path;
pub mod robustness;
pub mod session;

pub use betweenness::{Betweenness, BetweennessConfig};
pub use builder::{build_graph, Network};
pub use centrality::centrality_table;
pub use closeness::ClosenessConfig;
pub use degree::{degree_histogram, degree_table};
pub use eigenvector::EigenvectorConfig;
pub use error::{Error, Result};
pub use louvain::communities;
pub use path::shortest_path;
pub use robustness::{remove_nodes, robustness_metrics};
