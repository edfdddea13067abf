//! A module for computing clustering coefficients.

use std::collections::BTreeSet;

use crate::graph::{Graph, Vertex};

/// Distinct neighbours of `node` in the undirected projection, without `node` itself.
fn neighbours<T: Vertex>(graph: &Graph<T>, node: &T) -> BTreeSet<T> {
    let outgoing = graph.successors(node).into_iter().flatten();
    let incoming = graph.predecessors(node).into_iter().flatten();

    outgoing
        .chain(incoming)
        .filter(|neighbour| *neighbour != node)
        .copied()
        .collect()
}

/// Local clustering coefficient: the fraction of pairs of neighbours that are themselves
/// connected. Self-loops are ignored and vertices with fewer than two neighbours score `0.0`.
pub(crate) fn local_clustering<T: Vertex>(graph: &Graph<T>, node: &T) -> f64 {
    let neighbours = neighbours(graph, node);
    let degree = neighbours.len();

    if degree < 2 {
        return 0.0;
    }

    let mut links = 0;
    for (i, u) in neighbours.iter().enumerate() {
        let u_neighbours = self::neighbours(graph, u);
        links += neighbours
            .iter()
            .skip(i + 1)
            .filter(|v| u_neighbours.contains(*v))
            .count();
    }

    2.0 * links as f64 / (degree * (degree - 1)) as f64
}

/// Average of the local clustering coefficients over every vertex of the undirected
/// projection, `0.0` for graphs with fewer than three vertices.
pub(crate) fn average_clustering<T: Vertex>(graph: &Graph<T>) -> f64 {
    let n = graph.node_count();

    if n < 3 {
        return 0.0;
    }

    let total: f64 = graph
        .nodes()
        .map(|node| local_clustering(graph, &node))
        .sum();

    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle() {
        let graph = graph!([1, 2, 3, 1]);

        assert_eq!(graph.average_clustering(), 1.0);
    }

    #[test]
    fn line() {
        let graph = graph!([1, 2, 3]);

        assert_eq!(graph.average_clustering(), 0.0);
    }

    #[test]
    fn triangle_with_tail() {
        // 1-2-3 triangle, 4 hanging off 3.
        let graph = graph!([1, 2, 3, 1], [3, 4]);

        assert_eq!(local_clustering(&graph, &3), 1.0 / 3.0);
        assert_eq!(local_clustering(&graph, &4), 0.0);

        let expected = (1.0 + 1.0 + 1.0 / 3.0) / 4.0;
        assert!((graph.average_clustering() - expected).abs() < 1e-12);
    }

    #[test]
    fn small_graphs() {
        let graph = graph!([1, 2]);
        assert_eq!(graph.average_clustering(), 0.0);

        let graph: Graph<u32> = Graph::new();
        assert_eq!(graph.average_clustering(), 0.0);
    }

    #[test]
    fn self_loops_ignored() {
        let graph = graph!([1, 1], [1, 2, 3, 1]);

        assert_eq!(local_clustering(&graph, &1), 1.0);
    }
}
