//! A module for working with graphs.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Debug,
    hash::Hash,
};

use nalgebra::DMatrix;

use crate::{
    betweenness::{self, Betweenness, BetweennessConfig},
    closeness::{self, ClosenessConfig},
    clustering,
    components::{self, Components},
    edge::Edge,
    eigenvector::{self, EigenvectorConfig},
    error::{Error, Result},
    path::{self, PathOutcome},
};

/// The bounds a vertex identifier has to satisfy.
///
/// The `Ord` bound keeps every computation ordered by id, which makes results reproducible
/// and easy to compare when debugging.
pub trait Vertex: Copy + Eq + Hash + Ord + Debug {}

impl<T: Copy + Eq + Hash + Ord + Debug> Vertex for T {}

/// A simple graph (no parallel edges), directed or undirected.
///
/// The graph is built once and then treated as read-only: every derived view (the undirected
/// projection, a filtered subgraph, a graph with nodes removed) is returned as a new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph<T> {
    directed: bool,
    /// Outgoing neighbours per vertex. For undirected graphs both orientations are stored.
    successors: BTreeMap<T, BTreeSet<T>>,
    /// Incoming neighbours per vertex, identical to `successors` for undirected graphs.
    predecessors: BTreeMap<T, BTreeSet<T>>,
    edge_count: usize,
}

impl<T: Vertex> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Vertex> Graph<T> {
    /// Creates an empty directed graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::graph::Graph;
    ///
    /// let graph: Graph<u32> = Graph::new();
    /// assert!(graph.is_directed());
    /// ```
    pub fn new() -> Self {
        Self {
            directed: true,
            successors: BTreeMap::new(),
            predecessors: BTreeMap::new(),
            edge_count: 0,
        }
    }

    /// Creates an empty undirected graph.
    pub fn new_undirected() -> Self {
        Self {
            directed: false,
            ..Self::new()
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Adds an isolated vertex, returns `false` if it was already present.
    pub fn add_node(&mut self, node: T) -> bool {
        if self.successors.contains_key(&node) {
            return false;
        }

        self.successors.insert(node, BTreeSet::new());
        self.predecessors.insert(node, BTreeSet::new());

        true
    }

    /// Inserts an edge into the graph, adding its endpoints if needed.
    ///
    /// Inserting an edge that is already present is a no-op and returns `false`, so parallel
    /// routes between the same pair of airports collapse into one edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    /// use airnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// assert_eq!(graph.insert(Edge::new(1, 2)), true);
    /// assert_eq!(graph.insert(Edge::new(1, 2)), false);
    /// assert_eq!(graph.insert(Edge::new(2, 1)), true);
    /// assert_eq!(graph.edge_count(), 2);
    /// ```
    pub fn insert(&mut self, edge: Edge<T>) -> bool {
        let (source, target) = (*edge.source(), *edge.target());

        if self.contains(&edge) {
            return false;
        }

        self.add_node(source);
        self.add_node(target);

        self.link(source, target);
        if !self.directed {
            self.link(target, source);
        }

        self.edge_count += 1;

        true
    }

    /// Checks if the graph contains an edge. For undirected graphs the orientation is ignored.
    pub fn contains(&self, edge: &Edge<T>) -> bool {
        self.successors
            .get(edge.source())
            .is_some_and(|targets| targets.contains(edge.target()))
    }

    pub fn contains_node(&self, node: &T) -> bool {
        self.successors.contains_key(node)
    }

    /// Returns the vertex count of the graph.
    pub fn node_count(&self) -> usize {
        self.successors.len()
    }

    /// Returns the edge count of the graph. An undirected edge counts once.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    /// Iterates over the vertices in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = T> + '_ {
        self.successors.keys().copied()
    }

    /// Iterates over the edges in ascending `(source, target)` order. Undirected edges are
    /// yielded once, in their canonical orientation.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    /// use airnet::graph::Graph;
    ///
    /// let mut graph = Graph::new_undirected();
    /// graph.insert(Edge::new(2, 1));
    ///
    /// assert_eq!(graph.edges().collect::<Vec<_>>(), vec![Edge::new(1, 2)]);
    /// ```
    pub fn edges(&self) -> impl Iterator<Item = Edge<T>> + '_ {
        let directed = self.directed;

        self.successors.iter().flat_map(move |(source, targets)| {
            targets
                .iter()
                .map(move |target| Edge::new(*source, *target))
                .filter(move |edge| directed || edge.canonical() == *edge)
        })
    }

    /// Returns the vertices reachable over one outgoing edge (all neighbours when undirected).
    pub fn successors(&self, node: &T) -> Option<&BTreeSet<T>> {
        self.successors.get(node)
    }

    /// Returns the vertices with an edge pointing at `node` (all neighbours when undirected).
    pub fn predecessors(&self, node: &T) -> Option<&BTreeSet<T>> {
        self.predecessors.get(node)
    }

    pub fn out_degree(&self, node: &T) -> Option<usize> {
        self.successors.get(node).map(BTreeSet::len)
    }

    pub fn in_degree(&self, node: &T) -> Option<usize> {
        self.predecessors.get(node).map(BTreeSet::len)
    }

    /// Returns the degree of a vertex.
    ///
    /// For directed graphs this is the in-degree plus the out-degree. For undirected graphs
    /// it is the neighbour count, with a self-loop counting twice so that the degrees always
    /// sum to twice the edge count.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    /// use airnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("b", "a"));
    ///
    /// assert_eq!(graph.degree(&"a"), Some(2));
    /// assert_eq!(graph.to_undirected().degree(&"a"), Some(1));
    /// ```
    pub fn degree(&self, node: &T) -> Option<usize> {
        let successors = self.successors.get(node)?;

        if self.directed {
            self.in_degree(node).map(|in_degree| in_degree + successors.len())
        } else {
            let self_loop = usize::from(successors.contains(node));
            Some(successors.len() + self_loop)
        }
    }

    /// Returns the number of distinct vertices, other than `node` itself, adjacent to `node`
    /// in either direction.
    pub fn neighbour_count(&self, node: &T) -> Option<usize> {
        let successors = self.successors.get(node)?;
        let predecessors = self.predecessors.get(node)?;

        Some(
            successors
                .union(predecessors)
                .filter(|neighbour| *neighbour != node)
                .count(),
        )
    }

    /// Returns the undirected projection: every edge plus its reverse, as a new graph.
    ///
    /// An undirected graph is returned as a plain copy.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    /// use airnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new(1, 2));
    /// graph.insert(Edge::new(2, 1));
    /// graph.insert(Edge::new(2, 3));
    ///
    /// let undirected = graph.to_undirected();
    /// assert_eq!(undirected.edge_count(), 2);
    /// assert!(undirected.contains(&Edge::new(3, 2)));
    /// ```
    pub fn to_undirected(&self) -> Self {
        let mut undirected = Self::new_undirected();

        for node in self.nodes() {
            undirected.add_node(node);
        }

        for edge in self.edges() {
            undirected.insert(edge);
        }

        undirected
    }

    /// Returns the subgraph induced by the vertices for which `keep` returns `true`.
    pub fn subgraph<F>(&self, keep: F) -> Self
    where
        F: Fn(&T) -> bool,
    {
        let mut subgraph = Self {
            directed: self.directed,
            ..Self::new()
        };

        for node in self.nodes().filter(|node| keep(node)) {
            subgraph.add_node(node);
        }

        for edge in self.edges() {
            if keep(edge.source()) && keep(edge.target()) {
                subgraph.insert(edge);
            }
        }

        subgraph
    }

    /// Returns a copy of the graph without the given vertices and their edges.
    ///
    /// Every id has to be part of the graph, removing an unknown id is an input error.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    /// use airnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("b", "c"));
    ///
    /// let residual = graph.without_nodes(&["b"]).unwrap();
    /// assert_eq!(residual.node_count(), 2);
    /// assert_eq!(residual.edge_count(), 0);
    ///
    /// assert!(graph.without_nodes(&["z"]).is_err());
    /// ```
    pub fn without_nodes(&self, nodes: &[T]) -> Result<Self> {
        if let Some(unknown) = nodes.iter().find(|node| !self.contains_node(node)) {
            return Err(Error::unknown_node(unknown));
        }

        let removed: BTreeSet<T> = nodes.iter().copied().collect();
        Ok(self.subgraph(|node| !removed.contains(node)))
    }

    /// Returns the subgraph induced by the vertices whose degree is at least `min_degree`.
    pub fn with_min_degree(&self, min_degree: usize) -> Self {
        self.subgraph(|node| self.degree(node).unwrap_or(0) >= min_degree)
    }

    /// Returns the mapping of vertices to the row/column indices used by the matrix and
    /// index-based computations, sorted by `T`'s implementation of `Ord`.
    pub fn index(&self) -> BTreeMap<T, usize> {
        self.nodes()
            .enumerate()
            .map(|(i, node)| (node, i))
            .collect()
    }

    /// Constructs the adjacency matrix for this graph, rows and columns ordered by
    /// [`index`](Self::index). Entry `(i, j)` is `1.0` when there's an edge from `i` to `j`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use airnet::edge::Edge;
    /// use airnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// assert_eq!(
    ///     graph.adjacency_matrix(),
    ///     dmatrix![0.0, 1.0;
    ///              0.0, 0.0]
    /// );
    /// ```
    pub fn adjacency_matrix(&self) -> DMatrix<f64> {
        let n = self.node_count();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        for (i, targets) in self.adjacency_lists().iter().enumerate() {
            for j in targets {
                matrix[(i, *j)] = 1.0;
            }
        }

        matrix
    }

    /// Returns a mapping of vertices to their degree centrality: the number of distinct
    /// neighbours normalised by the maximum possible, `n - 1`.
    ///
    /// Neighbours are counted once regardless of how many directions connect them, so the
    /// value stays within `[0, 1]`. Graphs with fewer than two vertices map every vertex
    /// to `0.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    /// use airnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b"));
    /// graph.insert(Edge::new("a", "c"));
    ///
    /// let centrality = graph.degree_centrality();
    /// assert_eq!(centrality[&"a"], 1.0);
    /// assert_eq!(centrality[&"b"], 0.5);
    /// ```
    pub fn degree_centrality(&self) -> BTreeMap<T, f64> {
        let n = self.node_count();

        self.nodes()
            .map(|node| {
                let centrality = if n < 2 {
                    0.0
                } else {
                    self.neighbour_count(&node).unwrap_or(0) as f64 / (n - 1) as f64
                };
                (node, centrality)
            })
            .collect()
    }

    /// Returns a mapping of vertices to their betweenness centrality, exact or estimated from
    /// sampled pivots depending on the configured sample size.
    pub fn betweenness_centrality(&self, config: &BetweennessConfig) -> Betweenness<T> {
        let index = self.index();
        let result = betweenness::compute_betweenness(
            &self.adjacency_lists(),
            self.directed,
            config,
        );

        Betweenness {
            scores: index.keys().copied().zip(result.scores).collect(),
            sampled: result.sampled,
        }
    }

    /// Returns a mapping of vertices to their closeness centrality over outgoing paths.
    pub fn closeness_centrality(&self, config: &ClosenessConfig) -> BTreeMap<T, f64> {
        let scores = closeness::compute_closeness(&self.adjacency_lists(), config);

        self.nodes().zip(scores).collect()
    }

    /// Returns a mapping of vertices to their eigenvector centrality, or
    /// [`Error::NoConvergence`] if the power iteration doesn't settle.
    pub fn eigenvector_centrality(&self, config: &EigenvectorConfig) -> Result<BTreeMap<T, f64>> {
        let scores = eigenvector::compute_eigenvector(self.adjacency_matrix(), config)?;

        Ok(self.nodes().zip(scores.iter().copied()).collect())
    }

    /// Returns the connected components of the undirected projection.
    pub fn connected_components(&self) -> Components<T> {
        components::connected_components(self)
    }

    /// Returns the average local clustering coefficient of the undirected projection.
    pub fn average_clustering(&self) -> f64 {
        clustering::average_clustering(self)
    }

    /// Returns one shortest path between two vertices, see [`path::shortest_path`].
    pub fn shortest_path(&self, source: T, target: T) -> Result<PathOutcome<T>> {
        path::shortest_path(self, source, target)
    }

    //
    // Private
    //

    fn link(&mut self, source: T, target: T) {
        // Both endpoints were added before linking.
        if let Some(targets) = self.successors.get_mut(&source) {
            targets.insert(target);
        }
        if let Some(sources) = self.predecessors.get_mut(&target) {
            sources.insert(source);
        }
    }

    /// Returns, for each vertex in index order, the indices of its successors.
    pub(crate) fn adjacency_lists(&self) -> Vec<Vec<usize>> {
        let index = self.index();

        self.successors
            .values()
            .map(|targets| targets.iter().map(|target| index[target]).collect())
            .collect()
    }
}
