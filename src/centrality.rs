//! The combined per-vertex centrality table.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    betweenness::BetweennessConfig,
    closeness::ClosenessConfig,
    eigenvector::EigenvectorConfig,
    graph::{Graph, Vertex},
};

/// Configuration for every centrality measure in the table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityConfig {
    pub betweenness: BetweennessConfig,
    pub closeness: ClosenessConfig,
    pub eigenvector: EigenvectorConfig,
}

impl CentralityConfig {
    /// Sets the betweenness pivot sample size, `None` for an exact computation.
    pub fn with_sample_size(mut self, sample_size: Option<usize>) -> Self {
        self.betweenness.sample_size = sample_size;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CentralityRecord<T> {
    pub node: T,
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    /// `None` when eigenvector centrality failed, see [`CentralityTable::eigenvector_error`].
    pub eigenvector: Option<f64>,
}

/// Centrality measures side by side, one record per vertex in ascending order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CentralityTable<T> {
    pub records: Vec<CentralityRecord<T>>,
    /// The betweenness column is an estimate from sampled pivots.
    pub betweenness_sampled: bool,
    /// Why the eigenvector column is missing, if it is.
    pub eigenvector_error: Option<String>,
}

/// Computes degree, betweenness, closeness and eigenvector centrality for every vertex.
///
/// A failing measure doesn't take the others down: if the eigenvector iteration doesn't
/// converge the column is left empty and the reason recorded in the table.
///
/// # Examples
///
/// ```
/// use airnet::centrality::{centrality_table, CentralityConfig};
/// use airnet::edge::Edge;
/// use airnet::graph::Graph;
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("a", "b"));
/// graph.insert(Edge::new("b", "a"));
///
/// let table = centrality_table(&graph, &CentralityConfig::default());
///
/// assert_eq!(table.records.len(), 2);
/// assert_eq!(table.records[0].degree, 1.0);
/// assert!(table.eigenvector_error.is_none());
/// ```
pub fn centrality_table<T: Vertex>(
    graph: &Graph<T>,
    config: &CentralityConfig,
) -> CentralityTable<T> {
    let degree = graph.degree_centrality();
    let betweenness = graph.betweenness_centrality(&config.betweenness);
    let closeness = graph.closeness_centrality(&config.closeness);

    let eigenvector = graph.eigenvector_centrality(&config.eigenvector);
    let (eigenvector, eigenvector_error) = match eigenvector {
        Ok(scores) => (Some(scores), None),
        Err(err) => {
            warn!(%err, "leaving the eigenvector column empty");
            (None, Some(err.to_string()))
        }
    };

    let records = graph
        .nodes()
        .map(|node| CentralityRecord {
            node,
            degree: degree.get(&node).copied().unwrap_or(0.0),
            betweenness: betweenness.scores.get(&node).copied().unwrap_or(0.0),
            closeness: closeness.get(&node).copied().unwrap_or(0.0),
            eigenvector: eigenvector
                .as_ref()
                .and_then(|scores| scores.get(&node).copied()),
        })
        .collect();

    CentralityTable {
        records,
        betweenness_sampled: betweenness.sampled,
        eigenvector_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line() {
        let graph = graph!(["a", "b", "c"]);
        let config = CentralityConfig::default().with_sample_size(None);
        let table = centrality_table(&graph, &config);

        let b = &table.records[1];
        assert_eq!(b.node, "b");
        assert_eq!(b.degree, 1.0);
        assert_eq!(b.closeness, 1.0);
        // One of the two ordered pairs not involving b goes through it.
        assert_eq!(b.betweenness, 0.5);
        assert!(!table.betweenness_sampled);
    }

    #[test]
    fn eigenvector_failure_keeps_other_columns() {
        let graph = graph!([1, 2, 3]);
        let mut config = CentralityConfig::default();
        config.eigenvector.max_iterations = 5;

        let table = centrality_table(&graph, &config);

        assert!(table.records.iter().all(|r| r.eigenvector.is_none()));
        assert!(table
            .eigenvector_error
            .as_deref()
            .is_some_and(|err| err.contains("converge")));
        assert_eq!(table.records[0].closeness, 2.0 / 3.0);
    }

    #[test]
    fn empty_graph() {
        let graph: Graph<u32> = Graph::new();
        let table = centrality_table(&graph, &CentralityConfig::default());

        assert!(table.records.is_empty());
        assert!(table.eigenvector_error.is_none());
    }

    #[test]
    fn sampled_flag() {
        let ring: Vec<u32> = (0..12).chain([0]).collect();
        let graph = graph!(ring);
        let config = CentralityConfig::default().with_sample_size(Some(4));

        assert!(centrality_table(&graph, &config).betweenness_sampled);
    }
}
