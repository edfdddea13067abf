//! A module for computing closeness centrality.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Configuration for closeness centrality.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosenessConfig {
    /// Scale each score by the fraction of the graph the vertex reaches (Wasserman and Faust),
    /// so that a vertex reaching only a handful of close neighbours doesn't outrank a hub.
    pub wf_improved: bool,
}

impl ClosenessConfig {
    pub const fn with_wf_improved(mut self, wf_improved: bool) -> Self {
        self.wf_improved = wf_improved;
        self
    }
}

/// Breadth-first search from `index`, returns the number of vertices reached (excluding the
/// source) and the sum of their distances.
fn closeness_for_node(index: usize, indices: &[Vec<usize>]) -> (usize, usize) {
    let num_nodes = indices.len();

    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut distances: Vec<Option<usize>> = vec![None; num_nodes];

    distances[index] = Some(0);
    queue.push_back(index);

    let (mut reached, mut total_path_length) = (0, 0);

    while let Some(current) = queue.pop_front() {
        let next = distances[current].unwrap_or(0) + 1;

        for &neighbour in &indices[current] {
            if distances[neighbour].is_none() {
                distances[neighbour] = Some(next);
                queue.push_back(neighbour);

                reached += 1;
                total_path_length += next;
            }
        }
    }

    (reached, total_path_length)
}

/// Computes closeness over index-based adjacency lists, following outgoing edges.
///
/// A vertex's score is the inverse of its average distance to the vertices it reaches, and
/// `0.0` if it reaches none.
pub(crate) fn compute_closeness(indices: &[Vec<usize>], config: &ClosenessConfig) -> Vec<f64> {
    let num_nodes = indices.len();

    (0..num_nodes)
        .map(|index| {
            let (reached, total_path_length) = closeness_for_node(index, indices);

            if total_path_length == 0 {
                return 0.0;
            }

            let closeness = reached as f64 / total_path_length as f64;

            if config.wf_improved && num_nodes > 1 {
                closeness * reached as f64 / (num_nodes - 1) as f64
            } else {
                closeness
            }
        })
        .collect()
}
