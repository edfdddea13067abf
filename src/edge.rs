//! A module for working with edges.

use serde::Serialize;

/// A pair of vertices representing a route between two airports. Edges are directed: the
/// `source` is where the route departs and the `target` where it lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge<T> {
    source: T,
    target: T,
}

impl<T> Edge<T> {
    /// Creates a new edge from two vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    /// assert_ne!(edge, Edge::new("b", "a"));
    /// ```
    pub fn new(source: T, target: T) -> Self {
        Self { source, target }
    }

    /// Returns the vertex the edge leaves from.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    /// assert_eq!(edge.source(), &"a");
    /// ```
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the vertex the edge points to.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    /// assert_eq!(edge.target(), &"b");
    /// ```
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns whether the edge contains the given vertex at either end.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    ///
    /// assert_eq!(edge.contains(&"a"), true);
    /// assert_eq!(edge.contains(&"b"), true);
    /// assert_eq!(edge.contains(&"c"), false);
    /// ```
    pub fn contains(&self, vertex: &T) -> bool
    where
        T: PartialEq,
    {
        self.source() == vertex || self.target() == vertex
    }
}

impl<T: Copy + Ord> Edge<T> {
    /// Returns the edge pointing the other way.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    ///
    /// assert_eq!(Edge::new("a", "b").reversed(), Edge::new("b", "a"));
    /// ```
    pub fn reversed(&self) -> Self {
        Self::new(self.target, self.source)
    }

    /// Returns the orientation-free form of the edge, with the smaller vertex as the source.
    ///
    /// Two edges that connect the same pair of vertices in opposite directions share the same
    /// canonical form, which is how the undirected projection stores them.
    ///
    /// # Examples
    ///
    /// ```
    /// use airnet::edge::Edge;
    ///
    /// assert_eq!(Edge::new("b", "a").canonical(), Edge::new("a", "b"));
    /// assert_eq!(Edge::new("a", "b").canonical(), Edge::new("a", "b"));
    /// ```
    pub fn canonical(&self) -> Self {
        if self.source <= self.target {
            *self
        } else {
            self.reversed()
        }
    }
}

impl<T> From<(T, T)> for Edge<T> {
    fn from((source, target): (T, T)) -> Self {
        Self::new(source, target)
    }
}
