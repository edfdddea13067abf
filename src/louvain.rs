//! Louvain community detection.
//!
//! Modularity is optimised in two alternating phases on the undirected projection of the
//! graph:
//!
//! 1. **Local moving**: vertices are visited in a shuffled order and each is moved to the
//!    neighbouring community with the largest modularity gain, until a full pass moves
//!    nothing or the gain drops under the tolerance.
//! 2. **Aggregation**: every community becomes a single vertex, edges between communities are
//!    summed into weighted edges and internal edges into self-loops.
//!
//! The phases repeat on the aggregated graph until a level no longer improves modularity.
//! All randomness comes from the configured seed, two runs with the same seed on the same
//! graph produce the same partition.

use std::collections::BTreeMap;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{Graph, Vertex};

/// Configuration for Louvain community detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LouvainConfig {
    /// Seed for the vertex and candidate orderings.
    pub seed: u64,
    /// Resolution parameter, higher values favour smaller communities.
    pub resolution: f64,
    /// Minimum modularity gain for a pass or a level to count as an improvement.
    pub tolerance: f64,
    /// Only vertices with at least this degree (in the input graph) take part.
    pub min_degree: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            resolution: 1.0,
            tolerance: 1e-7,
            min_degree: 0,
        }
    }
}

impl LouvainConfig {
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub const fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub const fn with_min_degree(mut self, min_degree: usize) -> Self {
        self.min_degree = min_degree;
        self
    }
}

/// A community assignment for every vertex.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Partition<T: Ord> {
    /// Vertex to community id. Ids are contiguous from `0` and carry no meaning beyond
    /// grouping.
    pub assignments: BTreeMap<T, usize>,
    /// Modularity of the assignment on the undirected projection.
    pub modularity: f64,
    /// Number of aggregation levels that improved modularity.
    pub levels: usize,
}

impl<T: Vertex> Partition<T> {
    pub fn community_count(&self) -> usize {
        self.assignments
            .values()
            .max()
            .map_or(0, |highest| highest + 1)
    }

    /// Groups the vertices by community id.
    pub fn communities(&self) -> BTreeMap<usize, Vec<T>> {
        let mut communities: BTreeMap<usize, Vec<T>> = BTreeMap::new();

        for (node, community) in &self.assignments {
            communities.entry(*community).or_default().push(*node);
        }

        communities
    }
}

/// A weighted undirected graph over indices, the working graph of one aggregation level.
#[derive(Debug)]
struct Level {
    /// `(neighbour, weight)` pairs, self-loops excluded.
    neighbours: Vec<Vec<(usize, f64)>>,
    /// Self-loop weight per vertex.
    loops: Vec<f64>,
    /// Weighted degree per vertex, self-loops counting twice.
    degrees: Vec<f64>,
    /// Sum of all edge weights, each edge counted once.
    total_weight: f64,
}

impl Level {
    fn from_graph<T: Vertex>(graph: &Graph<T>) -> Self {
        let index = graph.index();
        let mut edges: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        let mut loops = vec![0.0; index.len()];

        for edge in graph.edges() {
            let (i, j) = (index[edge.source()], index[edge.target()]);
            if i == j {
                loops[i] = 1.0;
            } else {
                edges.insert((i.min(j), i.max(j)), 1.0);
            }
        }

        Self::from_edges(index.len(), edges, loops)
    }

    fn from_edges(n: usize, edges: BTreeMap<(usize, usize), f64>, loops: Vec<f64>) -> Self {
        let mut neighbours = vec![Vec::new(); n];
        let mut degrees: Vec<f64> = loops.iter().map(|w| 2.0 * w).collect();
        let mut total_weight: f64 = loops.iter().sum();

        for ((i, j), w) in edges {
            neighbours[i].push((j, w));
            neighbours[j].push((i, w));
            degrees[i] += w;
            degrees[j] += w;
            total_weight += w;
        }

        Self {
            neighbours,
            loops,
            degrees,
            total_weight,
        }
    }

    fn len(&self) -> usize {
        self.degrees.len()
    }

    /// Collapses each community into a single vertex.
    fn aggregate(&self, community: &[usize], count: usize) -> Self {
        let mut edges: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        let mut loops = vec![0.0; count];

        for (i, neighbours) in self.neighbours.iter().enumerate() {
            loops[community[i]] += self.loops[i];

            for &(j, w) in neighbours.iter().filter(|(j, _)| *j > i) {
                let (ci, cj) = (community[i], community[j]);
                if ci == cj {
                    loops[ci] += w;
                } else {
                    *edges.entry((ci.min(cj), ci.max(cj))).or_insert(0.0) += w;
                }
            }
        }

        Self::from_edges(count, edges, loops)
    }

    /// Modularity of an arbitrary assignment of this level's vertices.
    fn modularity(&self, community: &[usize], resolution: f64) -> f64 {
        let mut internals: BTreeMap<usize, f64> = BTreeMap::new();
        let mut totals: BTreeMap<usize, f64> = BTreeMap::new();

        for i in 0..self.len() {
            *totals.entry(community[i]).or_insert(0.0) += self.degrees[i];
            *internals.entry(community[i]).or_insert(0.0) += self.loops[i];

            for &(j, w) in self.neighbours[i].iter().filter(|(j, _)| *j > i) {
                if community[i] == community[j] {
                    *internals.entry(community[i]).or_insert(0.0) += w;
                }
            }
        }

        modularity_from_totals(
            internals.values().copied().zip(totals.values().copied()),
            self.total_weight,
            resolution,
        )
    }
}

/// `Q = Σc [ Lc / m - γ (dc / 2m)² ]` from `(Lc, dc)` pairs: the internal weight and the
/// summed degree of each community.
fn modularity_from_totals(
    communities: impl Iterator<Item = (f64, f64)>,
    total_weight: f64,
    resolution: f64,
) -> f64 {
    if total_weight == 0.0 {
        return 0.0;
    }

    communities
        .map(|(internal, total)| {
            internal / total_weight - resolution * (total / (2.0 * total_weight)).powi(2)
        })
        .sum()
}

/// Community bookkeeping for the local moving phase.
struct Status {
    community: Vec<usize>,
    /// Summed degree per community.
    totals: Vec<f64>,
    /// Internal edge weight per community.
    internals: Vec<f64>,
}

impl Status {
    /// Every vertex starts in its own community.
    fn new(level: &Level) -> Self {
        Self {
            community: (0..level.len()).collect(),
            totals: level.degrees.clone(),
            internals: level.loops.clone(),
        }
    }

    fn modularity(&self, level: &Level, resolution: f64) -> f64 {
        modularity_from_totals(
            self.internals
                .iter()
                .copied()
                .zip(self.totals.iter().copied()),
            level.total_weight,
            resolution,
        )
    }

    /// Edge weight from `node` to each neighbouring community.
    fn neighbour_communities(&self, level: &Level, node: usize) -> BTreeMap<usize, f64> {
        let mut weights = BTreeMap::new();

        for &(neighbour, w) in &level.neighbours[node] {
            *weights.entry(self.community[neighbour]).or_insert(0.0) += w;
        }

        weights
    }

    fn remove(&mut self, level: &Level, node: usize, community: usize, weight: f64) {
        self.totals[community] -= level.degrees[node];
        self.internals[community] -= weight + level.loops[node];
    }

    fn insert(&mut self, level: &Level, node: usize, community: usize, weight: f64) {
        self.community[node] = community;
        self.totals[community] += level.degrees[node];
        self.internals[community] += weight + level.loops[node];
    }
}

/// Runs local moving passes on one level until a pass moves nothing or stops paying off.
fn one_level(level: &Level, status: &mut Status, config: &LouvainConfig, rng: &mut StdRng) {
    let two_m = 2.0 * level.total_weight;
    let mut order: Vec<usize> = (0..level.len()).collect();
    let mut current = status.modularity(level, config.resolution);

    loop {
        let mut moved = false;
        order.shuffle(rng);

        for &node in &order {
            let community = status.community[node];
            let degree_share = level.degrees[node] / two_m;

            let weights = status.neighbour_communities(level, node);
            let own = weights.get(&community).copied().unwrap_or(0.0);

            status.remove(level, node, community, own);

            // Staying put scores exactly zero.
            let remove_cost = -own + config.resolution * status.totals[community] * degree_share;

            let mut candidates: Vec<(usize, f64)> =
                weights.iter().map(|(c, w)| (*c, *w)).collect();
            candidates.shuffle(rng);

            let (mut best, mut best_gain) = (community, 0.0);
            for (candidate, weight) in candidates {
                let gain = remove_cost + weight
                    - config.resolution * status.totals[candidate] * degree_share;

                if gain > best_gain {
                    best = candidate;
                    best_gain = gain;
                }
            }

            let weight = weights.get(&best).copied().unwrap_or(0.0);
            status.insert(level, node, best, weight);

            if best != community {
                moved = true;
            }
        }

        let next = status.modularity(level, config.resolution);
        if !moved || next - current < config.tolerance {
            break;
        }
        current = next;
    }
}

/// Relabels communities to `0..count` in order of first appearance, returns the count.
fn renumber(community: &mut [usize]) -> usize {
    let mut labels: BTreeMap<usize, usize> = BTreeMap::new();

    for c in community.iter_mut() {
        let next = labels.len();
        *c = *labels.entry(*c).or_insert(next);
    }

    labels.len()
}

/// Detects communities on the undirected projection of `graph` (restricted to vertices of
/// degree `min_degree` or more) by Louvain modularity optimisation.
///
/// A graph without edges puts every vertex in its own community with a modularity of `0.0`.
///
/// # Examples
///
/// ```
/// use airnet::edge::Edge;
/// use airnet::graph::Graph;
/// use airnet::louvain::{communities, LouvainConfig};
///
/// // Two triangles joined by a single bridge.
/// let mut graph = Graph::new();
/// for (a, b) in [(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4), (3, 4)] {
///     graph.insert(Edge::new(a, b));
/// }
///
/// let partition = communities(&graph, &LouvainConfig::default());
///
/// assert_eq!(partition.community_count(), 2);
/// assert_eq!(partition.assignments[&1], partition.assignments[&3]);
/// assert_ne!(partition.assignments[&3], partition.assignments[&4]);
/// ```
pub fn communities<T: Vertex>(graph: &Graph<T>, config: &LouvainConfig) -> Partition<T> {
    let projection = graph.with_min_degree(config.min_degree).to_undirected();
    let nodes: Vec<T> = projection.nodes().collect();
    let base = Level::from_graph(&projection);

    // Maps each original vertex to its vertex on the current level.
    let mut membership: Vec<usize> = (0..nodes.len()).collect();

    if base.total_weight == 0.0 {
        return Partition {
            assignments: nodes.into_iter().zip(membership).collect(),
            modularity: 0.0,
            levels: 0,
        };
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best = base.modularity(&membership, config.resolution);
    let mut aggregated: Option<Level> = None;
    let mut levels = 0;

    loop {
        let level = aggregated.as_ref().unwrap_or(&base);
        let mut status = Status::new(level);

        one_level(level, &mut status, config, &mut rng);

        let modularity = status.modularity(level, config.resolution);
        if modularity - best < config.tolerance {
            break;
        }

        let count = renumber(&mut status.community);
        for vertex in &mut membership {
            *vertex = status.community[*vertex];
        }

        levels += 1;
        best = modularity;
        debug!(level = levels, communities = count, modularity, "louvain level");

        aggregated = Some(level.aggregate(&status.community, count));
    }

    Partition {
        modularity: base.modularity(&membership, config.resolution),
        assignments: nodes.into_iter().zip(membership).collect(),
        levels,
    }
}

/// Modularity of an assignment on the undirected projection of `graph`. Vertices missing
/// from `assignments` count as singleton communities.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use airnet::edge::Edge;
/// use airnet::graph::Graph;
/// use airnet::louvain::modularity;
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("a", "b"));
///
/// let together = BTreeMap::from([("a", 0), ("b", 0)]);
/// assert_eq!(modularity(&graph, &together, 1.0), 0.0);
///
/// let apart = BTreeMap::from([("a", 0), ("b", 1)]);
/// assert_eq!(modularity(&graph, &apart, 1.0), -0.5);
/// ```
pub fn modularity<T: Vertex>(
    graph: &Graph<T>,
    assignments: &BTreeMap<T, usize>,
    resolution: f64,
) -> f64 {
    let projection = graph.to_undirected();
    let level = Level::from_graph(&projection);

    // Singletons get labels past every assigned id.
    let offset = assignments.values().max().map_or(0, |highest| highest + 1);
    let community: Vec<usize> = projection
        .nodes()
        .enumerate()
        .map(|(i, node)| assignments.get(&node).copied().unwrap_or(offset + i))
        .collect();

    level.modularity(&community, resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two 4-cliques joined by the single edge 3-4.
    fn barbell() -> Graph<u32> {
        graph!(
            [0, 1, 2, 3, 0],
            [0, 2],
            [1, 3],
            [4, 5, 6, 7, 4],
            [4, 6],
            [5, 7],
            [3, 4]
        )
    }

    #[test]
    fn config_defaults() {
        let config = LouvainConfig::default();

        assert_eq!(config.seed, 42);
        assert_eq!(config.resolution, 1.0);
        assert_eq!(config.min_degree, 0);
    }

    #[test]
    fn config_builder() {
        let config = LouvainConfig::default()
            .with_seed(7)
            .with_resolution(0.5)
            .with_tolerance(1e-3)
            .with_min_degree(2);

        assert_eq!(config.seed, 7);
        assert_eq!(config.resolution, 0.5);
        assert_eq!(config.tolerance, 1e-3);
        assert_eq!(config.min_degree, 2);
    }

    #[test]
    fn empty_graph() {
        let graph: Graph<u32> = Graph::new();
        let partition = communities(&graph, &LouvainConfig::default());

        assert!(partition.assignments.is_empty());
        assert_eq!(partition.modularity, 0.0);
        assert_eq!(partition.community_count(), 0);
    }

    #[test]
    fn edgeless_graph() {
        let mut graph: Graph<u32> = Graph::new();
        graph.add_node(1);
        graph.add_node(2);

        let partition = communities(&graph, &LouvainConfig::default());

        assert_eq!(partition.community_count(), 2);
        assert_eq!(partition.modularity, 0.0);
        assert_eq!(partition.levels, 0);
    }

    #[test]
    fn barbell_splits_in_two() {
        let partition = communities(&barbell(), &LouvainConfig::default());
        let groups: Vec<Vec<u32>> = partition.communities().into_values().collect();

        assert_eq!(groups.len(), 2);
        assert!(groups.contains(&vec![0, 1, 2, 3]));
        assert!(groups.contains(&vec![4, 5, 6, 7]));

        // 13 edges, each clique has 6 internal edges and a summed degree of 13.
        let expected = 2.0 * (6.0 / 13.0 - (13.0f64 / 26.0).powi(2));
        assert!((partition.modularity - expected).abs() < 1e-12);
    }

    #[test]
    fn same_seed_same_partition() {
        let graph = barbell();
        let config = LouvainConfig::default().with_seed(1234);

        assert_eq!(communities(&graph, &config), communities(&graph, &config));
    }

    #[test]
    fn reported_modularity_matches_assignment() {
        let graph = graph!([1, 2, 3, 4, 5, 6, 1], [1, 4], [2, 5], [7, 8, 9, 7], [6, 7]);
        let partition = communities(&graph, &LouvainConfig::default());

        let recomputed = modularity(&graph, &partition.assignments, 1.0);
        assert!((partition.modularity - recomputed).abs() < 1e-12);
        assert!(partition.modularity > 0.0);
    }

    #[test]
    fn min_degree_filters_vertices() {
        let mut graph = barbell();
        graph.insert(crate::edge::Edge::new(7, 99));

        let config = LouvainConfig::default().with_min_degree(2);
        let partition = communities(&graph, &config);

        assert!(!partition.assignments.contains_key(&99));
        assert_eq!(partition.assignments.len(), 8);
    }

    #[test]
    fn aggregation_preserves_weight() {
        let projection = barbell().to_undirected();
        let level = Level::from_graph(&projection);
        let community = vec![0, 0, 0, 0, 1, 1, 1, 1];

        let aggregated = level.aggregate(&community, 2);

        assert_eq!(aggregated.total_weight, level.total_weight);
        assert_eq!(aggregated.loops, vec![6.0, 6.0]);
        assert_eq!(aggregated.neighbours[0], vec![(1, 1.0)]);
        assert_eq!(
            aggregated.modularity(&[0, 1], 1.0),
            level.modularity(&community, 1.0)
        );
    }

    #[test]
    fn renumber_in_order_of_appearance() {
        let mut community = vec![5, 5, 2, 9, 2];

        assert_eq!(renumber(&mut community), 3);
        assert_eq!(community, vec![0, 0, 1, 2, 1]);
    }
}
