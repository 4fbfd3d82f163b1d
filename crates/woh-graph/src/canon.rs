//! Canonical labeling and automorphism generators respecting an ordered vertex partition.
//!
//! The search individualizes one vertex of the first non-singleton cell at a time and
//! refines to an equitable partition. Every discrete leaf yields a relabeled edge list;
//! the canonical form is the greatest one. Leaves that reproduce the first or the best
//! leaf yield automorphisms, which prune sibling subtrees in the same orbit and let the
//! search jump back to the branching node. Cells never leave their position range, so
//! the canonical graph keeps every block of the partition in place.

use std::collections::VecDeque;

use woh_core::errors::{ErrorInfo, WohError};

use crate::graph::Graph;

/// Result of canonically labeling a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalForm {
    /// Canonically relabeled graph, edges labeled in sorted order.
    pub graph: Graph,
    /// `labeling[v]` is the canonical position of input vertex `v`.
    pub labeling: Vec<usize>,
    /// Generators of the automorphism group of the input graph respecting the
    /// partition, as vertex maps. The identity is never listed.
    pub generators: Vec<Vec<usize>>,
}

/// Canonically labels `graph` with respect to the ordered `partition`.
///
/// Every vertex must appear in exactly one cell; empty cells are ignored.
pub fn canonical_form(graph: &Graph, partition: &[Vec<usize>]) -> Result<CanonicalForm, WohError> {
    let n = graph.order();
    let mut seen = vec![false; n];
    for &v in partition.iter().flatten() {
        if v >= n || seen[v] {
            return Err(WohError::Graph(
                ErrorInfo::new("invalid-partition", "partition cells must cover each vertex once")
                    .with_context("vertex", v.to_string())
                    .with_context("order", n.to_string()),
            ));
        }
        seen[v] = true;
    }
    if let Some(missing) = seen.iter().position(|covered| !covered) {
        return Err(WohError::Graph(
            ErrorInfo::new("invalid-partition", "partition does not cover every vertex")
                .with_context("vertex", missing.to_string()),
        ));
    }

    let adjacency = graph.adjacency();
    let mut root = Ordered::from_cells(n, partition);
    let initial: Vec<usize> = root.cell_starts();
    root.refine(&adjacency, initial);

    let mut search = Search {
        graph,
        adjacency: &adjacency,
        first: None,
        best: None,
        generators: Vec::new(),
    };
    let mut path = Vec::new();
    search.explore(root, &mut path);

    let best = search.best.ok_or_else(|| {
        WohError::Graph(ErrorInfo::new("canonical-search", "search produced no leaf"))
    })?;
    let canonical = graph.relabel(&best.pos)?.enumerate_edges();
    Ok(CanonicalForm {
        graph: canonical,
        labeling: best.pos,
        generators: search.generators,
    })
}

/// Ordered partition stored as a vertex sequence split into position ranges.
#[derive(Clone)]
struct Ordered {
    lab: Vec<usize>,
    pos: Vec<usize>,
    // Start position of the cell holding each vertex.
    cell_of: Vec<usize>,
    // Exclusive end of the cell starting at each position; stale elsewhere.
    end: Vec<usize>,
    cells: usize,
}

impl Ordered {
    fn from_cells(n: usize, partition: &[Vec<usize>]) -> Self {
        let mut ordered = Ordered {
            lab: Vec::with_capacity(n),
            pos: vec![0; n],
            cell_of: vec![0; n],
            end: vec![0; n],
            cells: 0,
        };
        for cell in partition.iter().filter(|cell| !cell.is_empty()) {
            let start = ordered.lab.len();
            for &v in cell {
                ordered.pos[v] = ordered.lab.len();
                ordered.cell_of[v] = start;
                ordered.lab.push(v);
            }
            ordered.end[start] = ordered.lab.len();
            ordered.cells += 1;
        }
        ordered
    }

    fn cell_starts(&self) -> Vec<usize> {
        let mut starts = Vec::with_capacity(self.cells);
        let mut start = 0;
        while start < self.lab.len() {
            starts.push(start);
            start = self.end[start];
        }
        starts
    }

    fn is_discrete(&self) -> bool {
        self.cells == self.lab.len()
    }

    fn first_nonsingleton(&self) -> Option<usize> {
        self.cell_starts()
            .into_iter()
            .find(|&start| self.end[start] - start > 1)
    }

    fn place(&mut self, position: usize, v: usize) {
        self.lab[position] = v;
        self.pos[v] = position;
    }

    /// Splits `v` off the front of its cell; returns the starts of both parts.
    fn individualize(&mut self, v: usize) -> (usize, usize) {
        let start = self.cell_of[v];
        let stop = self.end[start];
        let displaced = self.lab[start];
        let from = self.pos[v];
        self.place(start, v);
        self.place(from, displaced);
        self.end[start] = start + 1;
        self.end[start + 1] = stop;
        for &x in &self.lab[start + 1..stop] {
            self.cell_of[x] = start + 1;
        }
        self.cells += 1;
        (start, start + 1)
    }

    /// Refines to the coarsest equitable partition finer than the current one.
    fn refine(&mut self, adjacency: &[Vec<usize>], splitters: Vec<usize>) {
        let n = self.lab.len();
        let mut queued = vec![false; n];
        let mut queue = VecDeque::new();
        for start in splitters {
            if !queued[start] {
                queued[start] = true;
                queue.push_back(start);
            }
        }
        while let Some(splitter) = queue.pop_front() {
            queued[splitter] = false;
            if self.is_discrete() {
                break;
            }
            let members: Vec<usize> = self.lab[splitter..self.end[splitter]].to_vec();
            let mut count = vec![0usize; n];
            let mut touched = Vec::new();
            for &y in &members {
                for &x in &adjacency[y] {
                    if count[x] == 0 {
                        touched.push(self.cell_of[x]);
                    }
                    count[x] += 1;
                }
            }
            touched.sort_unstable();
            touched.dedup();
            for start in touched {
                let stop = self.end[start];
                if stop - start == 1 {
                    continue;
                }
                let mut cell: Vec<usize> = self.lab[start..stop].to_vec();
                let reference = count[cell[0]];
                if cell.iter().all(|&x| count[x] == reference) {
                    continue;
                }
                cell.sort_by_key(|&x| (count[x], x));
                for (offset, &x) in cell.iter().enumerate() {
                    self.place(start + offset, x);
                }
                let mut fragment = start;
                for position in start + 1..=stop {
                    if position < stop && count[self.lab[position]] == count[self.lab[position - 1]] {
                        continue;
                    }
                    self.end[fragment] = position;
                    for &x in &self.lab[fragment..position] {
                        self.cell_of[x] = fragment;
                    }
                    if fragment != start {
                        self.cells += 1;
                    }
                    if !queued[fragment] {
                        queued[fragment] = true;
                        queue.push_back(fragment);
                    }
                    fragment = position;
                }
            }
        }
    }
}

#[derive(Clone)]
struct Leaf {
    path: Vec<usize>,
    lab: Vec<usize>,
    pos: Vec<usize>,
    code: Vec<(usize, usize)>,
}

struct Search<'a> {
    graph: &'a Graph,
    adjacency: &'a [Vec<usize>],
    first: Option<Leaf>,
    best: Option<Leaf>,
    generators: Vec<Vec<usize>>,
}

impl Search<'_> {
    /// Returns the depth to jump back to after an automorphism was found.
    fn explore(&mut self, node: Ordered, path: &mut Vec<usize>) -> Option<usize> {
        let Some(target) = node.first_nonsingleton() else {
            return self.visit_leaf(&node, path);
        };
        let mut candidates: Vec<usize> = node.lab[target..node.end[target]].to_vec();
        candidates.sort_unstable();
        let mut explored: Vec<usize> = Vec::new();
        for v in candidates {
            if self.in_explored_orbit(v, &explored, path) {
                continue;
            }
            let mut child = node.clone();
            let (single, rest) = child.individualize(v);
            child.refine(self.adjacency, vec![single, rest]);
            path.push(v);
            let jump = self.explore(child, path);
            path.pop();
            explored.push(v);
            if let Some(depth) = jump {
                if depth < path.len() {
                    return Some(depth);
                }
            }
        }
        None
    }

    fn visit_leaf(&mut self, node: &Ordered, path: &[usize]) -> Option<usize> {
        let mut code: Vec<(usize, usize)> = self
            .graph
            .edges()
            .iter()
            .map(|edge| {
                let (a, b) = (node.pos[edge.u], node.pos[edge.v]);
                if a < b {
                    (a, b)
                } else {
                    (b, a)
                }
            })
            .collect();
        code.sort_unstable();
        let leaf = Leaf {
            path: path.to_vec(),
            lab: node.lab.clone(),
            pos: node.pos.clone(),
            code,
        };

        let Some(first) = &self.first else {
            self.first = Some(leaf.clone());
            self.best = Some(leaf);
            return None;
        };
        if first.code == leaf.code {
            let automorphism = first.pos.iter().map(|&p| leaf.lab[p]).collect();
            let depth = common_prefix(&first.path, &leaf.path);
            self.generators.push(automorphism);
            return Some(depth);
        }
        let best = self.best.as_ref()?;
        match leaf.code.cmp(&best.code) {
            std::cmp::Ordering::Equal => {
                let automorphism = best.pos.iter().map(|&p| leaf.lab[p]).collect();
                let depth = common_prefix(&best.path, &leaf.path);
                self.generators.push(automorphism);
                Some(depth)
            }
            std::cmp::Ordering::Greater => {
                self.best = Some(leaf);
                None
            }
            std::cmp::Ordering::Less => None,
        }
    }

    /// Whether `v` shares an orbit with an explored sibling under the automorphisms
    /// found so far that fix the current path pointwise.
    fn in_explored_orbit(&self, v: usize, explored: &[usize], path: &[usize]) -> bool {
        if explored.is_empty() || self.generators.is_empty() {
            return false;
        }
        let mut parent: Vec<usize> = (0..self.graph.order()).collect();
        for generator in self
            .generators
            .iter()
            .filter(|g| path.iter().all(|&f| g[f] == f))
        {
            for (idx, &mapped) in generator.iter().enumerate() {
                union(&mut parent, idx, mapped);
            }
        }
        let root = find(&mut parent, v);
        explored.iter().any(|&e| find(&mut parent, e) == root)
    }
}

fn common_prefix(a: &[usize], b: &[usize]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

fn find(parent: &mut [usize], idx: usize) -> usize {
    if parent[idx] != idx {
        let root = find(parent, parent[idx]);
        parent[idx] = root;
    }
    parent[idx]
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[rb] = ra;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_automorphism(graph: &Graph, map: &[usize]) -> bool {
        graph.relabel(map).map(|g| g.edges().iter().map(|e| (e.u, e.v)).eq(graph.edges().iter().map(|e| (e.u, e.v)))).unwrap_or(false)
    }

    #[test]
    fn isomorphic_paths_share_code() {
        let a = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3)]).unwrap();
        let b = Graph::from_edges(4, [(2, 0), (0, 3), (3, 1)]).unwrap();
        let cells = vec![(0..4).collect::<Vec<_>>()];
        let ca = canonical_form(&a, &cells).unwrap();
        let cb = canonical_form(&b, &cells).unwrap();
        assert_eq!(ca.graph, cb.graph);
        assert_eq!(ca.generators.len(), 1);
        assert!(is_automorphism(&a, &ca.generators[0]));
    }

    #[test]
    fn partition_blocks_stay_in_place() {
        // Star centered at 0 with leaves 1..=3; leaf 3 is pinned in its own cell.
        let star = Graph::from_edges(4, [(0, 1), (0, 2), (0, 3)]).unwrap();
        let cells = vec![vec![0], vec![1, 2], vec![3]];
        let form = canonical_form(&star, &cells).unwrap();
        assert_eq!(form.labeling[0], 0);
        assert_eq!(form.labeling[3], 3);
        assert_eq!(form.generators, vec![vec![0, 2, 1, 3]]);
    }

    #[test]
    fn complete_graph_generators_are_automorphisms() {
        let edges: Vec<(usize, usize)> = (0..5)
            .flat_map(|j| (0..j).map(move |i| (i, j)))
            .collect();
        let k5 = Graph::from_edges(5, edges).unwrap();
        let form = canonical_form(&k5, &[(0..5).collect()]).unwrap();
        assert!(!form.generators.is_empty());
        for generator in &form.generators {
            assert!(is_automorphism(&k5, generator));
        }
    }

    #[test]
    fn rejects_incomplete_partition() {
        let g = Graph::from_edges(3, [(0, 1)]).unwrap();
        let err = canonical_form(&g, &[vec![0, 1]]).unwrap_err();
        assert_eq!(err.info().code, "invalid-partition");
    }
}
