//! Property-based tests over random route graphs.

#![allow(clippy::float_cmp)]

use std::collections::BTreeSet;

use airnet::{
    communities,
    degree_table,
    edge::Edge,
    graph::Graph,
    louvain::LouvainConfig,
    path::PathOutcome,
    robustness::{RemovalStrategy, RemovedSet, Simulator},
    shortest_path,
};
use proptest::prelude::*;

/// Strategy for directed graphs over up to 12 vertices, some of them isolated.
fn arb_graph() -> impl Strategy<Value = Graph<u32>> {
    (
        1u32..12,
        prop::collection::vec((0u32..12, 0u32..12), 0..40),
    )
        .prop_map(|(nodes, edges)| {
            let mut graph = Graph::new();
            for node in 0..nodes {
                graph.add_node(node);
            }
            for (source, target) in edges {
                if source < nodes && target < nodes {
                    graph.insert(Edge::new(source, target));
                }
            }
            graph
        })
}

fn reachable(graph: &Graph<u32>, source: u32) -> BTreeSet<u32> {
    let mut seen = BTreeSet::from([source]);
    let mut stack = vec![source];

    while let Some(current) = stack.pop() {
        for &next in graph.successors(&current).into_iter().flatten() {
            if seen.insert(next) {
                stack.push(next);
            }
        }
    }

    seen
}

proptest! {
    #[test]
    fn undirected_degree_sum(graph in arb_graph()) {
        let undirected = graph.to_undirected();
        let total: usize = degree_table(&undirected).iter().map(|r| r.degree).sum();

        prop_assert_eq!(total, 2 * undirected.edge_count());
    }

    #[test]
    fn degree_centrality_bounds(graph in arb_graph()) {
        for (_, score) in graph.degree_centrality() {
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn path_to_self(graph in arb_graph()) {
        for node in graph.nodes() {
            prop_assert_eq!(
                shortest_path(&graph, node, node).unwrap(),
                PathOutcome::Found(vec![node])
            );
        }
    }

    #[test]
    fn no_path_iff_unreachable(graph in arb_graph()) {
        for source in graph.nodes() {
            let reached = reachable(&graph, source);

            for target in graph.nodes() {
                let outcome = shortest_path(&graph, source, target).unwrap();
                prop_assert_eq!(outcome.path().is_some(), reached.contains(&target));

                if let Some(path) = outcome.path() {
                    prop_assert_eq!(path.first(), Some(&source));
                    prop_assert_eq!(path.last(), Some(&target));
                    for hop in path.windows(2) {
                        prop_assert!(graph.contains(&Edge::new(hop[0], hop[1])));
                    }
                }
            }
        }
    }

    #[test]
    fn restore_gives_back_the_original(graph in arb_graph(), count in 0usize..6, seed in any::<u64>()) {
        let simulator = Simulator::new(&graph);
        let mut removed = RemovedSet::new();

        simulator.remove(&mut removed, RemovalStrategy::Random { count, seed }).unwrap();
        simulator.remove(&mut removed, RemovalStrategy::DegreeRanked { count }).unwrap();
        removed.restore_all();

        let residual = simulator.residual(&removed);
        prop_assert_eq!(residual.nodes().collect::<Vec<_>>(), graph.nodes().collect::<Vec<_>>());
        prop_assert_eq!(residual.edges().collect::<Vec<_>>(), graph.edges().collect::<Vec<_>>());
    }

    #[test]
    fn degree_ranked_takes_the_hub(graph in arb_graph()) {
        let degrees = degree_table(&graph);
        let max = degrees.iter().map(|r| r.degree).max().unwrap_or(0);
        let hubs: Vec<u32> = degrees
            .iter()
            .filter(|r| r.degree == max)
            .map(|r| r.node)
            .collect();

        let simulator = Simulator::new(&graph);
        let mut removed = RemovedSet::new();
        let picked = simulator
            .remove(&mut removed, RemovalStrategy::DegreeRanked { count: 2 })
            .unwrap();

        if let [hub] = hubs[..] {
            prop_assert!(picked.contains(&hub));
        }
    }

    #[test]
    fn louvain_is_deterministic(graph in arb_graph(), seed in any::<u64>()) {
        let config = LouvainConfig::default().with_seed(seed);
        let first = communities(&graph, &config);
        let second = communities(&graph, &config);

        prop_assert_eq!(&first.assignments, &second.assignments);
        prop_assert_eq!(first.modularity, second.modularity);
    }

    #[test]
    fn components_partition_the_vertices(graph in arb_graph()) {
        let components = graph.connected_components();
        let total: usize = components.sets.iter().map(BTreeSet::len).sum();

        prop_assert_eq!(total, graph.node_count());
        prop_assert!(components.sets.windows(2).all(|w| w[0].len() >= w[1].len()));
    }
}
