//! A module for decomposing a graph into connected components.

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;

use crate::graph::{Graph, Vertex};

/// The connected components of a graph's undirected projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Components<T: Ord> {
    /// Disjoint vertex sets, largest first. Equally sized components keep the order of their
    /// smallest vertex.
    pub sets: Vec<BTreeSet<T>>,
}

impl<T: Ord> Components<T> {
    pub fn count(&self) -> usize {
        self.sets.len()
    }

    /// Size of the largest component, `0` for an empty graph.
    pub fn largest(&self) -> usize {
        self.sets.first().map_or(0, BTreeSet::len)
    }
}

/// Partitions the vertices by breadth-first search, ignoring edge direction.
pub(crate) fn connected_components<T: Vertex>(graph: &Graph<T>) -> Components<T> {
    let mut seen: BTreeSet<T> = BTreeSet::new();
    let mut sets = Vec::new();

    for start in graph.nodes() {
        if !seen.insert(start) {
            continue;
        }

        let mut component = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let outgoing = graph.successors(&current).into_iter().flatten();
            let incoming = graph.predecessors(&current).into_iter().flatten();

            for &neighbour in outgoing.chain(incoming) {
                if seen.insert(neighbour) {
                    component.insert(neighbour);
                    queue.push_back(neighbour);
                }
            }
        }

        sets.push(component);
    }

    // Stable, so ties stay in discovery order.
    sets.sort_by(|a, b| b.len().cmp(&a.len()));

    Components { sets }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let graph: Graph<u32> = Graph::new();
        let components = graph.connected_components();

        assert_eq!(components.count(), 0);
        assert_eq!(components.largest(), 0);
    }

    #[test]
    fn direction_is_ignored() {
        // a -> b <- c is weakly connected.
        let graph = graph!(["a", "b"], ["c", "b"]);
        let components = graph.connected_components();

        assert_eq!(components.count(), 1);
        assert_eq!(components.largest(), 3);
    }

    #[test]
    fn largest_first() {
        let mut graph = graph!([1, 2], [3, 4, 5]);
        graph.add_node(6);

        let components = graph.connected_components();

        assert_eq!(components.count(), 3);
        assert_eq!(components.largest(), 3);
        assert_eq!(components.sets[0], BTreeSet::from([3, 4, 5]));
        assert_eq!(components.sets[1], BTreeSet::from([1, 2]));
        assert_eq!(components.sets[2], BTreeSet::from([6]));
    }
}
