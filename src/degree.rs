//! Per-vertex degree records and the degree distribution.

use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::graph::{Graph, Vertex};

/// Default bin count of the degree histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DegreeRecord<T> {
    pub node: T,
    /// Routes arriving at the vertex. Equal to `degree` on undirected graphs.
    pub in_degree: usize,
    /// Routes leaving the vertex. Equal to `degree` on undirected graphs.
    pub out_degree: usize,
    /// In plus out on directed graphs, the plain degree on undirected ones.
    pub degree: usize,
}

/// One equal-width bin of the degree histogram, `[lower, upper)` except for the last bin
/// which includes its upper bound.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Returns the degree of every vertex, in ascending vertex order.
///
/// # Examples
///
/// ```
/// use airnet::degree::degree_table;
/// use airnet::edge::Edge;
/// use airnet::graph::Graph;
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("gru", "gig"));
/// graph.insert(Edge::new("gig", "gru"));
/// graph.insert(Edge::new("gru", "bsb"));
///
/// let table = degree_table(&graph);
/// let gru = table.iter().find(|record| record.node == "gru").unwrap();
///
/// assert_eq!((gru.in_degree, gru.out_degree, gru.degree), (1, 2, 3));
/// ```
pub fn degree_table<T: Vertex>(graph: &Graph<T>) -> Vec<DegreeRecord<T>> {
    graph
        .nodes()
        .map(|node| {
            let degree = graph.degree(&node).unwrap_or(0);
            let (in_degree, out_degree) = if graph.is_directed() {
                (
                    graph.in_degree(&node).unwrap_or(0),
                    graph.out_degree(&node).unwrap_or(0),
                )
            } else {
                (degree, degree)
            };

            DegreeRecord {
                node,
                in_degree,
                out_degree,
                degree,
            }
        })
        .collect()
}

/// Bins the degree distribution into `bins` equal-width intervals spanning the observed
/// minimum to maximum degree.
///
/// An empty graph or zero bins yields no bins. When every vertex has the same degree the
/// range is widened to `[d - 0.5, d + 0.5]` so the single value still lands in a bin.
pub fn degree_histogram<T: Vertex>(graph: &Graph<T>, bins: usize) -> Vec<Bin> {
    let degrees: Vec<f64> = graph
        .nodes()
        .map(|node| graph.degree(&node).unwrap_or(0) as f64)
        .collect();

    let (min, max) = match degrees.iter().copied().minmax_by(f64::total_cmp) {
        _ if bins == 0 => return Vec::new(),
        MinMaxResult::NoElements => return Vec::new(),
        MinMaxResult::OneElement(d) => (d - 0.5, d + 0.5),
        MinMaxResult::MinMax(min, max) if min == max => (min - 0.5, max + 0.5),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for degree in degrees {
        let slot = (((degree - min) / width) as usize).min(bins - 1);
        histogram[slot].count += 1;
    }

    histogram
}
