//! Robustness simulation: remove airports and watch the network fall apart.
//!
//! The base graph is never touched. Removals accumulate in a [`RemovedSet`] owned by the
//! caller, and every metric is recomputed from scratch on the residual graph.

use std::collections::BTreeSet;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{Error, Result},
    graph::{Graph, Vertex},
};

/// Structural metrics of a graph's undirected projection.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RobustnessMetrics {
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub largest_component: usize,
    pub avg_clustering: f64,
}

/// Computes the [`RobustnessMetrics`] of `graph`, all zeros for an empty graph.
///
/// # Examples
///
/// ```
/// use airnet::edge::Edge;
/// use airnet::graph::Graph;
/// use airnet::robustness::robustness_metrics;
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("a", "b"));
/// graph.insert(Edge::new("b", "a"));
/// graph.add_node("c");
///
/// let metrics = robustness_metrics(&graph);
///
/// assert_eq!(metrics.nodes, 3);
/// assert_eq!(metrics.edges, 1);
/// assert_eq!(metrics.components, 2);
/// assert_eq!(metrics.largest_component, 2);
/// ```
pub fn robustness_metrics<T: Vertex>(graph: &Graph<T>) -> RobustnessMetrics {
    let projection = graph.to_undirected();
    let components = projection.connected_components();

    RobustnessMetrics {
        nodes: projection.node_count(),
        edges: projection.edge_count(),
        components: components.count(),
        largest_component: components.largest(),
        avg_clustering: projection.average_clustering(),
    }
}

/// Returns a copy of `graph` without `ids`, failing on ids that aren't in the graph.
pub fn remove_nodes<T: Vertex>(graph: &Graph<T>, ids: &[T]) -> Result<Graph<T>> {
    graph.without_nodes(ids)
}

/// The vertices currently excluded from the network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RemovedSet<T: Ord> {
    nodes: BTreeSet<T>,
}

impl<T: Ord> Default for RemovedSet<T> {
    fn default() -> Self {
        Self {
            nodes: BTreeSet::new(),
        }
    }
}

impl<T: Vertex> RemovedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, node: &T) -> bool {
        self.nodes.contains(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removed vertices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.nodes.iter().copied()
    }

    /// Brings every vertex back.
    pub fn restore_all(&mut self) {
        self.nodes.clear();
    }
}

/// How the next vertices to remove are picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalStrategy<T> {
    /// One given vertex.
    Manual(T),
    /// The `count` active vertices with the highest degree in the base graph. Ties go to the
    /// smaller id.
    DegreeRanked { count: usize },
    /// `count` active vertices drawn uniformly without replacement.
    Random { count: usize, seed: u64 },
}

/// Defaults for the ranked and random strategies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobustnessConfig {
    /// Vertices removed per ranked or random step.
    pub count: usize,
    pub seed: u64,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self { count: 1, seed: 42 }
    }
}

impl RobustnessConfig {
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn degree_ranked<T>(&self) -> RemovalStrategy<T> {
        RemovalStrategy::DegreeRanked { count: self.count }
    }

    pub fn random<T>(&self) -> RemovalStrategy<T> {
        RemovalStrategy::Random {
            count: self.count,
            seed: self.seed,
        }
    }
}

/// The residual network compared to the base one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RobustnessReport<T> {
    pub original: RobustnessMetrics,
    pub current: RobustnessMetrics,
    /// Removed vertices in ascending order.
    pub removed: Vec<T>,
    /// Undirected edges missing from the residual graph.
    pub edges_lost: usize,
    /// Largest component size relative to the base graph's, `0.0` when the base graph has no
    /// vertices.
    pub largest_component_ratio: f64,
}

/// Applies removal strategies against a fixed base graph.
#[derive(Clone, Debug)]
pub struct Simulator<'a, T> {
    base: &'a Graph<T>,
    original: RobustnessMetrics,
}

impl<'a, T: Vertex> Simulator<'a, T> {
    pub fn new(base: &'a Graph<T>) -> Self {
        Self {
            base,
            original: robustness_metrics(base),
        }
    }

    /// Metrics of the base graph.
    pub fn original(&self) -> &RobustnessMetrics {
        &self.original
    }

    /// Picks vertices with `strategy` among those still active and adds them to `removed`.
    ///
    /// Returns the newly removed vertices. Removing an already removed vertex is a no-op, an id
    /// that isn't in the base graph is an [`Error::UnknownNode`].
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    /// use airnet::graph::Graph;
    /// use airnet::robustness::{RemovalStrategy, RemovedSet, Simulator};
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("b", "c"));
    ///
    /// let simulator = Simulator::new(&graph);
    /// let mut removed = RemovedSet::new();
    ///
    /// let picked = simulator
    ///     .remove(&mut removed, RemovalStrategy::DegreeRanked { count: 1 })
    ///     .unwrap();
    /// assert_eq!(picked, vec!["b"]);
    ///
    /// let report = simulator.report(&removed);
    /// assert_eq!(report.current.edges, 0);
    /// assert_eq!(report.current.components, 2);
    /// assert_eq!(report.edges_lost, 2);
    /// ```
    pub fn remove(
        &self,
        removed: &mut RemovedSet<T>,
        strategy: RemovalStrategy<T>,
    ) -> Result<Vec<T>> {
        let active: Vec<T> = self
            .base
            .nodes()
            .filter(|node| !removed.contains(node))
            .collect();

        let picked: Vec<T> = match strategy {
            RemovalStrategy::Manual(node) => {
                if !self.base.contains_node(&node) {
                    return Err(Error::unknown_node(&node));
                }

                if removed.contains(&node) {
                    Vec::new()
                } else {
                    vec![node]
                }
            }
            RemovalStrategy::DegreeRanked { count } => {
                let mut ranked: Vec<(T, usize)> = active
                    .into_iter()
                    .map(|node| (node, self.base.degree(&node).unwrap_or(0)))
                    .collect();
                // Stable over ascending ids.
                ranked.sort_by(|a, b| b.1.cmp(&a.1));

                ranked.into_iter().take(count).map(|(node, _)| node).collect()
            }
            RemovalStrategy::Random { count, seed } => {
                let mut rng = StdRng::seed_from_u64(seed);

                active.choose_multiple(&mut rng, count).copied().collect()
            }
        };

        removed.nodes.extend(picked.iter().copied());
        info!(
            picked = picked.len(),
            removed = removed.len(),
            "removed vertices"
        );

        Ok(picked)
    }

    /// The base graph without the removed vertices.
    pub fn residual(&self, removed: &RemovedSet<T>) -> Graph<T> {
        self.base.subgraph(|node| !removed.contains(node))
    }

    pub fn report(&self, removed: &RemovedSet<T>) -> RobustnessReport<T> {
        let current = robustness_metrics(&self.residual(removed));
        let largest_component_ratio = if self.original.largest_component > 0 {
            current.largest_component as f64 / self.original.largest_component as f64
        } else {
            0.0
        };

        RobustnessReport {
            edges_lost: self.original.edges.saturating_sub(current.edges),
            removed: removed.iter().collect(),
            original: self.original.clone(),
            current,
            largest_component_ratio,
        }
    }
}
