use std::ops::Range;

use log::debug;
use woh_core::errors::{ErrorInfo, WohError};
use woh_graph::perm::cross_permutations;
use woh_graph::{Graph, Layout};

use crate::params::{AggregatedParams, SpaceKey};
use crate::session::Session;
use crate::space::GraphVectorSpace;

/// Disjoint unions of connected pieces, built recursively by splitting off one
/// component at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatedSpace {
    params: AggregatedParams,
}

/// A way to split an aggregated tuple into one component and the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    /// The split-off single component.
    pub first: AggregatedParams,
    /// The remaining `n_components - 1` components.
    pub rest: AggregatedParams,
}

impl AggregatedSpace {
    /// Space of the given tuple.
    pub fn new(params: AggregatedParams) -> Self {
        Self { params }
    }

    /// Underlying tuple.
    pub fn params(&self) -> &AggregatedParams {
        &self.params
    }

    /// Splits into one component and the rest where both sides are valid, both carry
    /// an omega or epsilon, and the excesses add up.
    ///
    /// Genus splits as `genus = genus_1 + genus_2 - 1`; every other count splits
    /// additively.
    pub fn configurations(&self) -> Vec<Configuration> {
        let p = &self.params;
        if p.n_components < 2 {
            return Vec::new();
        }
        let mut out = Vec::new();
        for v1 in 0..=p.n_vertices {
            for genus_1 in 1..=p.genus {
                let genus_2 = p.genus - genus_1 + 1;
                for n1 in 0..=p.n_numbered {
                    for omega_1 in 0..=p.n_omega {
                        for eps_1 in 0..=p.n_epsilon {
                            if omega_1 + eps_1 == 0
                                || (p.n_omega - omega_1) + (p.n_epsilon - eps_1) == 0
                            {
                                continue;
                            }
                            for dl_1 in 0..=p.n_double_legs {
                                let first = AggregatedParams::new(
                                    1, v1, genus_1, n1, omega_1, eps_1, dl_1,
                                );
                                let rest = AggregatedParams::new(
                                    p.n_components - 1,
                                    p.n_vertices - v1,
                                    genus_2,
                                    p.n_numbered - n1,
                                    p.n_omega - omega_1,
                                    p.n_epsilon - eps_1,
                                    p.n_double_legs - dl_1,
                                );
                                if first.is_valid()
                                    && rest.is_valid()
                                    && first.excess() + rest.excess() == p.excess()
                                {
                                    out.push(Configuration { first, rest });
                                }
                            }
                        }
                    }
                }
            }
        }
        out
    }
}

fn block(start: usize, len: usize) -> Range<usize> {
    start..start + len
}

/// Vertex orders placing a disjoint union `first ∪ rest` into the combined layout.
///
/// In the union the vertices of `rest` follow those of `first`. Each order lists old
/// vertices in their new position: internal vertices of both sides, the numbered legs
/// interleaved by one cross permutation, then both omega blocks and both epsilon
/// blocks.
fn vertex_orders(first: &AggregatedParams, rest: &AggregatedParams) -> Vec<Vec<usize>> {
    let divider = first.total_vertices();
    let (v1, n1, omega_1, eps_1) = (first.n_vertices, first.n_numbered, first.n_omega, first.n_epsilon);
    let (v2, n2, omega_2, eps_2) = (rest.n_vertices, rest.n_numbered, rest.n_omega, rest.n_epsilon);

    let internal: Vec<usize> = block(0, v1).chain(block(divider, v2)).collect();
    let numbered_first: Vec<usize> = block(v1, n1).collect();
    let numbered_rest: Vec<usize> = block(divider + v2, n2).collect();
    let omega: Vec<usize> = block(v1 + n1, omega_1)
        .chain(block(divider + v2 + n2, omega_2))
        .collect();
    let epsilon: Vec<usize> = block(v1 + n1 + omega_1, eps_1)
        .chain(block(divider + v2 + n2 + omega_2, eps_2))
        .collect();

    cross_permutations(&numbered_first, &numbered_rest)
        .into_iter()
        .map(|numbered| {
            internal
                .iter()
                .chain(numbered.iter())
                .chain(omega.iter())
                .chain(epsilon.iter())
                .copied()
                .collect()
        })
        .collect()
}

/// Relabeling sending `order[k]` to `k`.
fn placement(order: &[usize]) -> Vec<usize> {
    let mut p = vec![0; order.len()];
    for (position, &old) in order.iter().enumerate() {
        p[old] = position;
    }
    p
}

impl GraphVectorSpace for AggregatedSpace {
    fn key(&self) -> SpaceKey {
        SpaceKey::Aggregated(self.params)
    }

    fn is_valid(&self) -> bool {
        self.params.is_valid()
    }

    fn layout_for(&self, _graph: &Graph) -> Result<Layout, WohError> {
        Ok(self.params.layout())
    }

    fn generating_graphs(&self, session: &Session) -> Result<Vec<Graph>, WohError> {
        let p = &self.params;
        if let Some(component) = p.as_component() {
            return session.basis(&SpaceKey::Component(component))?.graphs();
        }

        let expected_edges = p.n_graph_edges();
        let mut out = Vec::new();
        for Configuration { first, rest } in self.configurations() {
            let first_basis = session.basis(&SpaceKey::Aggregated(first))?;
            let rest_basis = session.basis(&SpaceKey::Aggregated(rest))?;
            if first_basis.is_empty() || rest_basis.is_empty() {
                continue;
            }
            debug!(
                "aggregated {}: joining {} ({}) with {} ({})",
                p.file_stem(),
                first.file_stem(),
                first_basis.dimension(),
                rest.file_stem(),
                rest_basis.dimension()
            );
            let placements: Vec<Vec<usize>> = vertex_orders(&first, &rest)
                .iter()
                .map(|order| placement(order))
                .collect();
            let rest_graphs = rest_basis.graphs()?;
            for single in first_basis.graphs()? {
                for multiple in &rest_graphs {
                    let joined = single.disjoint_union(multiple);
                    if joined.order() != p.total_vertices() || joined.size() as i64 != expected_edges {
                        return Err(WohError::Graph(
                            ErrorInfo::new("aggregate-shape", "joined graph does not fit its tuple")
                                .with_context("space", p.file_stem())
                                .with_context("order", joined.order().to_string())
                                .with_context("size", joined.size().to_string()),
                        ));
                    }
                    for relabeling in &placements {
                        out.push(joined.relabel(relabeling)?);
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_interleave_numbered_legs_only() {
        let first = AggregatedParams::new(1, 1, 2, 1, 1, 0, 0);
        let rest = AggregatedParams::new(1, 0, 1, 1, 1, 0, 1);
        let orders = vertex_orders(&first, &rest);
        // first: internal 0, numbered 1, omega 2; rest: numbered 3, omega 4.
        assert_eq!(orders, vec![vec![0, 1, 3, 2, 4], vec![0, 3, 1, 2, 4]]);
        assert_eq!(placement(&orders[1]), vec![0, 2, 3, 1, 4]);
    }

    #[test]
    fn single_component_has_no_configurations() {
        let space = AggregatedSpace::new(AggregatedParams::new(1, 0, 1, 1, 1, 0, 1));
        assert!(space.configurations().is_empty());
    }

    #[test]
    fn two_numbered_omega_legs_split_once() {
        let space = AggregatedSpace::new(AggregatedParams::new(2, 0, 1, 2, 2, 0, 2));
        let configurations = space.configurations();
        assert_eq!(configurations.len(), 1);
        let leg = AggregatedParams::new(1, 0, 1, 1, 1, 0, 1);
        assert_eq!(configurations[0].first, leg);
        assert_eq!(configurations[0].rest, leg);
    }
}
