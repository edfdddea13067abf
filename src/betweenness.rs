//! A module for computing betweenness centrality, exactly or from sampled pivots.

use std::collections::{BTreeMap, VecDeque};

use rand::{rngs::StdRng, seq::index, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pivot count used when the graph has more vertices than this.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// Configuration for betweenness centrality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetweennessConfig {
    /// Number of source pivots to sample. Graphs with at most this many vertices are
    /// computed exactly; `None` always computes exactly. Written as `0` in configuration
    /// files.
    #[serde(with = "sample_size")]
    pub sample_size: Option<usize>,
    /// Seed for the pivot sampling.
    pub seed: u64,
    /// Whether to normalise by the number of vertex pairs.
    pub normalized: bool,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            sample_size: Some(DEFAULT_SAMPLE_SIZE),
            seed: 42,
            normalized: true,
        }
    }
}

impl BetweennessConfig {
    /// Always computes over every source vertex.
    pub fn exact() -> Self {
        Self {
            sample_size: None,
            ..Self::default()
        }
    }

    pub const fn with_sample_size(mut self, sample_size: Option<usize>) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub const fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }
}

/// `sample_size = 0` in a configuration file asks for an exact computation.
mod sample_size {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.unwrap_or(0) as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let k = usize::deserialize(deserializer)?;
        Ok((k > 0).then_some(k))
    }
}

/// Betweenness scores per vertex.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Betweenness<T> {
    pub scores: BTreeMap<T, f64>,
    /// `true` when the scores were estimated from sampled pivots rather than computed over
    /// every source.
    pub sampled: bool,
}

pub(crate) struct IndexedBetweenness {
    pub scores: Vec<f64>,
    pub sampled: bool,
}

/// this is an implementation of Ulrik Brandes's
/// A Faster Algorithm for Betweenness Centrality
/// http://snap.stanford.edu/class/cs224w-readings/brandes01centrality.pdf
/// page 10, "Algorithm 1: Betweenness centrality in unweighted graphs"
fn betweenness_for_node(index: usize, indices: &[Vec<usize>], betweenness_count: &mut [f64]) {
    let num_nodes = indices.len();

    let mut sigma: Vec<f64> = vec![0.0; num_nodes];
    let mut distance: Vec<Option<usize>> = vec![None; num_nodes];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); num_nodes];
    let mut delta: Vec<f64> = vec![0.0; num_nodes];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut stack: Vec<usize> = Vec::new();

    sigma[index] = 1.0;
    distance[index] = Some(0);
    queue.push_back(index);

    while let Some(v) = queue.pop_front() {
        stack.push(v);
        // Every queued vertex has been assigned a distance.
        let next = distance[v].unwrap_or(0) + 1;

        for &w in &indices[v] {
            if distance[w].is_none() {
                distance[w] = Some(next);
                queue.push_back(w);
            }
            if distance[w] == Some(next) {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
        if w != index {
            betweenness_count[w] += delta[w];
        }
    }
}

/// Picks the source vertices to accumulate from, all of them unless sampling applies.
fn pivots(num_nodes: usize, config: &BetweennessConfig) -> (Vec<usize>, bool) {
    match config.sample_size {
        Some(k) if k > 0 && k < num_nodes => {
            let mut rng = StdRng::seed_from_u64(config.seed);
            let mut sampled = index::sample(&mut rng, num_nodes, k).into_vec();
            sampled.sort_unstable();
            (sampled, true)
        }
        _ => ((0..num_nodes).collect(), false),
    }
}

/// Computes betweenness over index-based adjacency lists (`indices[v]` holds the successors
/// of `v`).
///
/// The raw Brandes sums are rescaled the same way regardless of sampling: normalised results
/// are divided by `(n - 1)(n - 2)`, unnormalised undirected results by two since each pair is
/// accumulated from both ends. A sampled run is then extrapolated by `n / k`.
pub(crate) fn compute_betweenness(
    indices: &[Vec<usize>],
    directed: bool,
    config: &BetweennessConfig,
) -> IndexedBetweenness {
    let num_nodes = indices.len();
    let mut betweenness_count: Vec<f64> = vec![0.0; num_nodes];

    let (sources, sampled) = pivots(num_nodes, config);
    debug!(
        nodes = num_nodes,
        pivots = sources.len(),
        sampled,
        "computing betweenness"
    );

    for &source in &sources {
        betweenness_for_node(source, indices, &mut betweenness_count);
    }

    let mut scale = if config.normalized {
        if num_nodes > 2 {
            Some(1.0 / ((num_nodes - 1) * (num_nodes - 2)) as f64)
        } else {
            None
        }
    } else if directed {
        None
    } else {
        Some(0.5)
    };

    if sampled && !sources.is_empty() {
        let extrapolation = num_nodes as f64 / sources.len() as f64;
        scale = Some(scale.unwrap_or(1.0) * extrapolation);
    }

    if let Some(scale) = scale {
        for count in &mut betweenness_count {
            *count *= scale;
        }
    }

    IndexedBetweenness {
        scores: betweenness_count,
        sampled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn exact(normalized: bool) -> BetweennessConfig {
        BetweennessConfig::exact().with_normalized(normalized)
    }

    #[test]
    fn undirected_line() {
        let graph = graph!(["a", "b", "c", "d"]).to_undirected();
        let betweenness = graph.betweenness_centrality(&exact(false));

        assert!(!betweenness.sampled);
        assert_eq!(betweenness.scores[&"a"], 0.0);
        assert_eq!(betweenness.scores[&"b"], 2.0);
        assert_eq!(betweenness.scores[&"c"], 2.0);
        assert_eq!(betweenness.scores[&"d"], 0.0);
    }

    #[test]
    fn undirected_line_normalized() {
        let graph = graph!(["a", "b", "c", "d"]).to_undirected();
        let betweenness = graph.betweenness_centrality(&exact(true));

        // Two of the three pairs not involving b pass through it.
        assert!((betweenness.scores[&"b"] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn directed_line() {
        let graph = graph!(["a", "b", "c"]);
        let betweenness = graph.betweenness_centrality(&exact(false));

        // Only the a -> c path exists and it goes through b.
        assert_eq!(betweenness.scores[&"b"], 1.0);
        assert_eq!(betweenness.scores[&"a"], 0.0);
        assert_eq!(betweenness.scores[&"c"], 0.0);
    }

    #[test]
    fn split_shortest_paths() {
        // Two equally short a-c paths, via b and via d.
        let graph = graph!(["a", "b", "c"], ["a", "d", "c"]);
        let betweenness = graph.betweenness_centrality(&exact(false));

        assert_eq!(betweenness.scores[&"b"], 0.5);
        assert_eq!(betweenness.scores[&"d"], 0.5);
    }

    #[test]
    fn star_center() {
        let graph = graph!([0, 1], [0, 2], [0, 3], [0, 4]).to_undirected();
        let betweenness = graph.betweenness_centrality(&exact(true));

        assert!((betweenness.scores[&0] - 1.0).abs() < 1e-12);
        assert_eq!(betweenness.scores[&1], 0.0);
    }

    #[test]
    fn empty_graph() {
        let graph: Graph<u32> = Graph::new();
        let betweenness = graph.betweenness_centrality(&BetweennessConfig::default());

        assert!(betweenness.scores.is_empty());
        assert!(!betweenness.sampled);
    }

    #[test]
    fn sampling_only_above_sample_size() {
        let ring: Vec<u32> = (0..10).chain([0]).collect();
        let graph = graph!(ring).to_undirected();

        let small = BetweennessConfig::default().with_sample_size(Some(10));
        assert!(!graph.betweenness_centrality(&small).sampled);

        let sampled = BetweennessConfig::default().with_sample_size(Some(4));
        assert!(graph.betweenness_centrality(&sampled).sampled);
    }

    #[test]
    fn sampling_is_seeded() {
        let ring: Vec<u32> = (0..30).chain([0]).collect();
        let graph = graph!(ring, [0, 15]).to_undirected();
        let config = BetweennessConfig::default().with_sample_size(Some(5)).with_seed(7);

        assert_eq!(
            graph.betweenness_centrality(&config),
            graph.betweenness_centrality(&config)
        );
    }

    #[test]
    fn zero_sample_size_is_exact() {
        let config = BetweennessConfig::default().with_sample_size(Some(0));
        let (sources, sampled) = pivots(20, &config);

        assert!(!sampled);
        assert_eq!(sources.len(), 20);
    }

    #[test]
    fn exact_survives_serialization() {
        let json = serde_json::to_string(&BetweennessConfig::exact()).unwrap();
        assert!(json.contains(r#""sample_size":0"#));

        let config: BetweennessConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, BetweennessConfig::exact());

        let config: BetweennessConfig = serde_json::from_str(r#"{"sample_size":8}"#).unwrap();
        assert_eq!(config.sample_size, Some(8));
    }

    #[test]
    fn pivots_are_distinct() {
        let config = BetweennessConfig::default().with_sample_size(Some(8));
        let (sources, sampled) = pivots(20, &config);

        assert!(sampled);
        assert_eq!(sources.len(), 8);
        assert!(sources.windows(2).all(|w| w[0] < w[1]));
    }
}
