//! A module for unweighted shortest paths over directed routes.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use crate::{
    error::{Error, Result},
    graph::{Graph, Vertex},
};

/// The outcome of a shortest path query between two known vertices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "path", rename_all = "snake_case")]
pub enum PathOutcome<T> {
    /// The vertices along the path, source and target included.
    Found(Vec<T>),
    /// The target can't be reached from the source following edge directions.
    NotFound,
}

impl<T> PathOutcome<T> {
    pub fn path(&self) -> Option<&[T]> {
        match self {
            PathOutcome::Found(path) => Some(path),
            PathOutcome::NotFound => None,
        }
    }

    /// Number of edges travelled, `None` if there is no path.
    pub fn hops(&self) -> Option<usize> {
        self.path().map(|path| path.len().saturating_sub(1))
    }
}

fn ensure_known<T: Vertex>(graph: &Graph<T>, node: &T) -> Result<()> {
    if graph.contains_node(node) {
        Ok(())
    } else {
        Err(Error::unknown_node(node))
    }
}

/// Returns one shortest path from `source` to `target`, respecting edge direction.
///
/// Among several equally short paths, the one found first when visiting successors in
/// ascending order is returned. Unknown endpoints are an error, an unreachable target is
/// [`PathOutcome::NotFound`].
///
/// # Examples
///
/// ```
/// use airnet::edge::Edge;
/// use airnet::graph::Graph;
/// use airnet::path::{shortest_path, PathOutcome};
///
/// let mut graph = Graph::new();
/// graph.insert(Edge::new("a", "b"));
/// graph.insert(Edge::new("b", "c"));
///
/// assert_eq!(
///     shortest_path(&graph, "a", "c").unwrap(),
///     PathOutcome::Found(vec!["a", "b", "c"])
/// );
/// assert_eq!(shortest_path(&graph, "c", "a").unwrap(), PathOutcome::NotFound);
/// assert!(shortest_path(&graph, "a", "z").is_err());
/// ```
pub fn shortest_path<T: Vertex>(
    graph: &Graph<T>,
    source: T,
    target: T,
) -> Result<PathOutcome<T>> {
    ensure_known(graph, &source)?;
    ensure_known(graph, &target)?;

    if source == target {
        return Ok(PathOutcome::Found(vec![source]));
    }

    // Maps each visited vertex to the vertex it was discovered from.
    let mut parents: BTreeMap<T, T> = BTreeMap::new();
    let mut queue = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        for &next in graph.successors(&current).into_iter().flatten() {
            if next == source || parents.contains_key(&next) {
                continue;
            }

            parents.insert(next, current);

            if next == target {
                let mut path = vec![target];
                let mut step = target;
                while let Some(&parent) = parents.get(&step) {
                    path.push(parent);
                    step = parent;
                }
                path.reverse();

                return Ok(PathOutcome::Found(path));
            }

            queue.push_back(next);
        }
    }

    Ok(PathOutcome::NotFound)
}

/// Returns every shortest path from `source` to `target`, sorted. The result is empty when
/// the target is unreachable.
///
/// # Examples
///
/// ```
/// use airnet::edge::Edge;
/// use airnet::graph::Graph;
/// use airnet::path::all_shortest_paths;
///
/// let mut graph = Graph::new();
/// for (source, target) in [("a", "b"), ("b", "c"), ("a", "d"), ("d", "c")] {
///     graph.insert(Edge::new(source, target));
/// }
///
/// assert_eq!(
///     all_shortest_paths(&graph, "a", "c").unwrap(),
///     vec![vec!["a", "b", "c"], vec!["a", "d", "c"]]
/// );
/// ```
pub fn all_shortest_paths<T: Vertex>(
    graph: &Graph<T>,
    source: T,
    target: T,
) -> Result<Vec<Vec<T>>> {
    ensure_known(graph, &source)?;
    ensure_known(graph, &target)?;

    if source == target {
        return Ok(vec![vec![source]]);
    }

    // Each vertex maps to its distance from the source and to the vertices one layer closer
    // that reach it.
    let mut distances: BTreeMap<T, usize> = BTreeMap::from([(source, 0)]);
    let mut parents: BTreeMap<T, Vec<T>> = BTreeMap::new();
    let mut queue = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        let next_distance = distances[&current] + 1;

        // The target layer is complete, anything further is longer.
        if distances.get(&target).is_some_and(|d| next_distance > *d) {
            break;
        }

        for &next in graph.successors(&current).into_iter().flatten() {
            match distances.get(&next) {
                None => {
                    distances.insert(next, next_distance);
                    parents.entry(next).or_default().push(current);
                    queue.push_back(next);
                }
                Some(&d) if d == next_distance => {
                    parents.entry(next).or_default().push(current);
                }
                Some(_) => {}
            }
        }
    }

    if !distances.contains_key(&target) {
        return Ok(Vec::new());
    }

    // Unwind from the target, extending each partial path with every parent.
    let mut paths = Vec::new();
    let mut partial = vec![vec![target]];

    while let Some(path) = partial.pop() {
        let head = path[path.len() - 1];

        if head == source {
            paths.push(path.into_iter().rev().collect::<Vec<_>>());
            continue;
        }

        for parent in parents.get(&head).into_iter().flatten() {
            let mut extended = path.clone();
            extended.push(*parent);
            partial.push(extended);
        }
    }

    paths.sort();

    Ok(paths)
}
