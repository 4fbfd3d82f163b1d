use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use woh_core::errors::{ErrorInfo, WohError};

/// Undirected edge stored with `u < v`, carrying its reference label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Smaller endpoint.
    pub u: usize,
    /// Larger endpoint.
    pub v: usize,
    /// Reference label recording a total order over edges, used only for signs.
    pub label: usize,
}

impl Edge {
    fn new(a: usize, b: usize, label: usize) -> Self {
        let (u, v) = if a < b { (a, b) } else { (b, a) };
        Self { u, v, label }
    }

    /// Returns the endpoint opposite to `x`, if `x` is an endpoint.
    pub fn other(&self, x: usize) -> Option<usize> {
        if self.u == x {
            Some(self.v)
        } else if self.v == x {
            Some(self.u)
        } else {
            None
        }
    }
}

/// Undirected simple graph on the dense vertex range `0..order`.
///
/// Edges are kept sorted by endpoints, so the position of an edge in [`Graph::edges`]
/// is its index in the reference "sorted edge" order. Every editing operation
/// returns a new graph and leaves `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Graph {
    order: usize,
    edges: Vec<Edge>,
}

fn graph_error(code: &str, message: impl Into<String>) -> WohError {
    WohError::Graph(ErrorInfo::new(code, message))
}

impl Graph {
    /// Creates a graph with `order` vertices and no edges.
    pub fn empty(order: usize) -> Self {
        Self {
            order,
            edges: Vec::new(),
        }
    }

    /// Builds a graph from unlabeled edges; labels follow the sorted edge order.
    pub fn from_edges<I>(order: usize, edges: I) -> Result<Self, WohError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let graph = Self::from_labeled_edges(order, edges.into_iter().map(|(a, b)| (a, b, 0)))?;
        Ok(graph.enumerate_edges())
    }

    /// Builds a graph from labeled edges, rejecting loops, repeated edges and
    /// out-of-range endpoints.
    pub fn from_labeled_edges<I>(order: usize, edges: I) -> Result<Self, WohError>
    where
        I: IntoIterator<Item = (usize, usize, usize)>,
    {
        let mut collected: Vec<Edge> = Vec::new();
        for (a, b, label) in edges {
            if a >= order || b >= order {
                return Err(WohError::Graph(
                    ErrorInfo::new("vertex-out-of-range", "edge endpoint exceeds graph order")
                        .with_context("edge", format!("{a}-{b}"))
                        .with_context("order", order.to_string()),
                ));
            }
            if a == b {
                return Err(WohError::Graph(
                    ErrorInfo::new("loop-edge", "simple graphs cannot carry loops")
                        .with_context("vertex", a.to_string()),
                ));
            }
            collected.push(Edge::new(a, b, label));
        }
        collected.sort_by_key(|edge| (edge.u, edge.v));
        if let Some(pair) = collected
            .windows(2)
            .find(|pair| (pair[0].u, pair[0].v) == (pair[1].u, pair[1].v))
        {
            return Err(WohError::Graph(
                ErrorInfo::new("repeated-edge", "simple graphs cannot repeat an edge")
                    .with_context("edge", format!("{}-{}", pair[0].u, pair[0].v)),
            ));
        }
        Ok(Self {
            order,
            edges: collected,
        })
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    /// Edges in sorted order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edge labels read in sorted edge order.
    pub fn labels(&self) -> Vec<usize> {
        self.edges.iter().map(|edge| edge.label).collect()
    }

    fn position(&self, a: usize, b: usize) -> Option<usize> {
        let key = if a < b { (a, b) } else { (b, a) };
        self.edges
            .binary_search_by_key(&key, |edge| (edge.u, edge.v))
            .ok()
    }

    /// Returns whether `a` and `b` are adjacent.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.position(a, b).is_some()
    }

    /// Label of the edge between `a` and `b`.
    pub fn edge_label(&self, a: usize, b: usize) -> Option<usize> {
        self.position(a, b).map(|idx| self.edges[idx].label)
    }

    /// Sorted neighbors of `v`.
    pub fn neighbors(&self, v: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self.edges.iter().filter_map(|edge| edge.other(v)).collect();
        out.sort_unstable();
        out
    }

    /// Number of edges incident to `v`.
    pub fn degree(&self, v: usize) -> usize {
        self.edges.iter().filter(|edge| edge.other(v).is_some()).count()
    }

    /// Neighbor lists for every vertex.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut rows = vec![Vec::new(); self.order];
        for edge in &self.edges {
            rows[edge.u].push(edge.v);
            rows[edge.v].push(edge.u);
        }
        for row in &mut rows {
            row.sort_unstable();
        }
        rows
    }

    /// Returns a copy whose labels are the positions in sorted edge order.
    pub fn enumerate_edges(&self) -> Graph {
        let edges = self
            .edges
            .iter()
            .enumerate()
            .map(|(label, edge)| Edge { label, ..*edge })
            .collect();
        Graph {
            order: self.order,
            edges,
        }
    }

    /// Maps vertex `i` to `p[i]`, keeping edge labels.
    ///
    /// Fails with a sign error when `p` is not a bijection of `0..order`, since a
    /// silently wrong relabeling corrupts every downstream orientation.
    pub fn relabel(&self, p: &[usize]) -> Result<Graph, WohError> {
        if !crate::perm::is_permutation(p) || p.len() != self.order {
            return Err(WohError::Sign(
                ErrorInfo::new("not-a-permutation", "relabeling is not a bijection on the vertices")
                    .with_context("order", self.order.to_string())
                    .with_context("relabeling", format!("{p:?}")),
            ));
        }
        let mut edges: Vec<Edge> = self
            .edges
            .iter()
            .map(|edge| Edge::new(p[edge.u], p[edge.v], edge.label))
            .collect();
        edges.sort_by_key(|edge| (edge.u, edge.v));
        Ok(Graph {
            order: self.order,
            edges,
        })
    }

    /// Disjoint union with `other` placed after `self`; labels of `other` are shifted
    /// past those of `self`.
    pub fn disjoint_union(&self, other: &Graph) -> Graph {
        let label_shift = self.edges.iter().map(|e| e.label + 1).max().unwrap_or(0);
        let mut edges = self.edges.clone();
        edges.extend(other.edges.iter().map(|edge| Edge {
            u: edge.u + self.order,
            v: edge.v + self.order,
            label: edge.label + label_shift,
        }));
        Graph {
            order: self.order + other.order,
            edges,
        }
    }

    /// Returns whether the graph is connected. The empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        self.component_count() <= 1
    }

    /// Number of connected components.
    pub fn component_count(&self) -> usize {
        let adjacency = self.adjacency();
        let mut seen = vec![false; self.order];
        let mut components = 0;
        for start in 0..self.order {
            if seen[start] {
                continue;
            }
            components += 1;
            let mut stack = vec![start];
            seen[start] = true;
            while let Some(x) = stack.pop() {
                for &y in &adjacency[x] {
                    if !seen[y] {
                        seen[y] = true;
                        stack.push(y);
                    }
                }
            }
        }
        components
    }

    /// Adds an edge with the given label.
    pub fn with_edge(&self, a: usize, b: usize, label: usize) -> Result<Graph, WohError> {
        if self.has_edge(a, b) {
            return Err(graph_error("repeated-edge", format!("edge {a}-{b} already present")));
        }
        let mut triples: Vec<(usize, usize, usize)> =
            self.edges.iter().map(|e| (e.u, e.v, e.label)).collect();
        triples.push((a, b, label));
        Graph::from_labeled_edges(self.order, triples)
    }

    /// Removes the edge between `a` and `b` if present.
    pub fn without_edge(&self, a: usize, b: usize) -> Graph {
        let mut out = self.clone();
        if let Some(idx) = self.position(a, b) {
            out.edges.remove(idx);
        }
        out
    }

    /// Moves the edge `from` onto the vertex pair `to`, keeping its label.
    pub fn move_edge(&self, from: (usize, usize), to: (usize, usize)) -> Result<Graph, WohError> {
        let label = self.edge_label(from.0, from.1).ok_or_else(|| {
            graph_error("missing-edge", format!("edge {}-{} not present", from.0, from.1))
        })?;
        self.without_edge(from.0, from.1).with_edge(to.0, to.1, label)
    }

    /// Appends a new leaf vertex attached to `anchor` by an edge labeled `label`.
    pub fn with_leaf(&self, anchor: usize, label: usize) -> Result<Graph, WohError> {
        let grown = Graph {
            order: self.order + 1,
            edges: self.edges.clone(),
        };
        grown.with_edge(anchor, self.order, label)
    }

    /// Deletes `v` and its edges, shifting every higher vertex down by one.
    pub fn without_vertex(&self, v: usize) -> Graph {
        let shift = |x: usize| if x > v { x - 1 } else { x };
        let edges = self
            .edges
            .iter()
            .filter(|edge| edge.u != v && edge.v != v)
            .map(|edge| Edge::new(shift(edge.u), shift(edge.v), edge.label))
            .collect::<Vec<_>>();
        let mut out = Graph {
            order: self.order.saturating_sub(1),
            edges,
        };
        out.edges.sort_by_key(|edge| (edge.u, edge.v));
        out
    }

    /// Merges `removed` into `kept` and deletes `removed`, shifting higher vertices down.
    ///
    /// The edge between the two vertices disappears. Returns `None` when the merge would
    /// identify two edges, since a repeated edge makes the graph vanish.
    pub fn merge_vertices(&self, kept: usize, removed: usize) -> Option<Graph> {
        let mut pairs: BTreeSet<(usize, usize)> = BTreeSet::new();
        let mut triples = Vec::with_capacity(self.edges.len());
        for edge in &self.edges {
            let a = if edge.u == removed { kept } else { edge.u };
            let b = if edge.v == removed { kept } else { edge.v };
            if a == b {
                continue;
            }
            let key = if a < b { (a, b) } else { (b, a) };
            if !pairs.insert(key) {
                return None;
            }
            triples.push((a, b, edge.label));
        }
        let merged = Graph::from_labeled_edges(self.order, triples).ok()?;
        Some(merged.without_vertex(removed))
    }
}
