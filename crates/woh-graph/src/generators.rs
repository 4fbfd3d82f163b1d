use std::collections::BTreeMap;

use log::debug;
use woh_core::errors::WohError;

use crate::canon::canonical_form;
use crate::graph::Graph;
use crate::graph6;

/// Connected simple graphs on `n_vertices` vertices with exactly `n_edges` edges,
/// one per isomorphism class, sorted by graph6 code.
///
/// Graphs are grown one edge at a time from the empty graph and deduplicated by
/// canonical form after every step; branches that can no longer become connected
/// with the remaining edges are dropped.
pub fn connected_graphs(n_vertices: usize, n_edges: usize) -> Result<Vec<Graph>, WohError> {
    if n_vertices == 0 {
        return Ok(if n_edges == 0 { vec![Graph::empty(0)] } else { Vec::new() });
    }
    let max_edges = n_vertices * (n_vertices - 1) / 2;
    if n_edges + 1 < n_vertices || n_edges > max_edges {
        return Ok(Vec::new());
    }
    let cell = vec![(0..n_vertices).collect::<Vec<_>>()];
    let mut level: Vec<Graph> = vec![Graph::empty(n_vertices)];
    for added in 0..n_edges {
        let remaining = n_edges - added - 1;
        let mut next: BTreeMap<String, Graph> = BTreeMap::new();
        for graph in &level {
            for v in 1..n_vertices {
                for u in 0..v {
                    if graph.has_edge(u, v) {
                        continue;
                    }
                    let grown = graph.with_edge(u, v, added)?;
                    if grown.component_count() > remaining + 1 {
                        continue;
                    }
                    let form = canonical_form(&grown, &cell)?;
                    next.entry(graph6::encode(&form.graph)).or_insert(form.graph);
                }
            }
        }
        level = next.into_values().collect();
    }
    Ok(level.into_iter().filter(Graph::is_connected).collect())
}

/// Connected graphs with `n_vertices` internal vertices carrying `n_hairs` leaves.
///
/// The internal part has `n_vertices - 1 + n_loops` edges; hairs are appended as the
/// last vertices, several hairs may sit on one internal vertex, and every internal
/// vertex ends up with total degree at least three. The result is deduplicated up to
/// isomorphisms preserving the internal/hair split and sorted by graph6 code. The
/// only graph without internal vertices is a single edge joining two hairs.
pub fn hairy_graphs(
    n_vertices: usize,
    n_loops: usize,
    n_hairs: usize,
) -> Result<Vec<Graph>, WohError> {
    if n_vertices == 0 {
        if n_loops == 0 && n_hairs == 2 {
            return Ok(vec![Graph::from_edges(2, [(0, 1)])?]);
        }
        return Ok(Vec::new());
    }
    let n_edges = n_vertices - 1 + n_loops;
    let cores = connected_graphs(n_vertices, n_edges)?;
    let cells = vec![
        (0..n_vertices).collect::<Vec<_>>(),
        (n_vertices..n_vertices + n_hairs).collect::<Vec<_>>(),
    ];
    let mut unique: BTreeMap<String, Graph> = BTreeMap::new();
    for core in &cores {
        let deficits: Vec<usize> = (0..n_vertices)
            .map(|v| 3usize.saturating_sub(core.degree(v)))
            .collect();
        for counts in hair_distributions(&deficits, n_hairs) {
            let mut edges: Vec<(usize, usize)> =
                core.edges().iter().map(|edge| (edge.u, edge.v)).collect();
            let mut next_hair = n_vertices;
            for (v, &count) in counts.iter().enumerate() {
                for _ in 0..count {
                    edges.push((v, next_hair));
                    next_hair += 1;
                }
            }
            let hairy = Graph::from_edges(n_vertices + n_hairs, edges)?;
            let form = canonical_form(&hairy, &cells)?;
            unique
                .entry(graph6::encode(&form.graph))
                .or_insert(form.graph);
        }
    }
    debug!(
        "hairy graphs: vertices={n_vertices} loops={n_loops} hairs={n_hairs} cores={} graphs={}",
        cores.len(),
        unique.len()
    );
    Ok(unique.into_values().collect())
}

/// Hair counts per vertex with `counts[v] >= minimum[v]` summing to `total`.
fn hair_distributions(minimum: &[usize], total: usize) -> Vec<Vec<usize>> {
    let required: usize = minimum.iter().sum();
    if required > total {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut current = minimum.to_vec();
    spread(&mut current, 0, total - required, &mut out);
    out
}

fn spread(current: &mut Vec<usize>, from: usize, spare: usize, out: &mut Vec<Vec<usize>>) {
    if from + 1 >= current.len() {
        if let Some(last) = current.len().checked_sub(1) {
            current[last] += spare;
            out.push(current.clone());
            current[last] -= spare;
        }
        return;
    }
    for extra in 0..=spare {
        current[from] += extra;
        spread(current, from + 1, spare - extra, out);
        current[from] -= extra;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distributions_respect_minimum() {
        let all = hair_distributions(&[1, 0], 3);
        assert_eq!(all, vec![vec![1, 2], vec![2, 1], vec![3, 0]]);
        assert!(hair_distributions(&[2, 2], 3).is_empty());
    }

    #[test]
    fn single_vertex_takes_every_spare_hair() {
        assert_eq!(hair_distributions(&[3], 5), vec![vec![5]]);
        assert!(hair_distributions(&[], 0).is_empty());
    }

    #[test]
    fn connected_graph_counts() {
        // Trees on four vertices: the path and the star.
        assert_eq!(connected_graphs(4, 3).unwrap().len(), 2);
        // Connected graphs on four vertices with four edges: the 4-cycle and the paw.
        assert_eq!(connected_graphs(4, 4).unwrap().len(), 2);
        assert_eq!(connected_graphs(3, 3).unwrap().len(), 1);
        assert!(connected_graphs(4, 2).unwrap().is_empty());
    }
}
