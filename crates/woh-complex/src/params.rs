//! Parameter tuples identifying graph vector spaces, with their derived counts and
//! validity arithmetic.
//!
//! Derived quantities (inner edges, loops, excess, degree) can go negative for
//! nonsensical tuples, so they are computed as `i64`; validity checks reject those
//! tuples before any graph is generated.

use std::fmt;

use serde::{Deserialize, Serialize};
use woh_core::errors::WohError;
use woh_graph::Layout;

/// `3(genus-1) + 2n - 2ω`.
pub fn excess(genus: usize, n_numbered: usize, n_omega: usize) -> i64 {
    3 * (genus as i64 - 1) + 2 * n_numbered as i64 - 2 * n_omega as i64
}

fn max_edges(n_vertices: usize) -> i64 {
    let v = n_vertices as i64;
    v * (v - 1) / 2
}

/// A single connected piece: internal vertices, inner loop order and hair counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentParams {
    /// Internal vertices.
    pub n_vertices: usize,
    /// Loop order of the inner graph.
    pub n_loops: usize,
    /// Numbered legs.
    pub n_numbered: usize,
    /// Omega hairs.
    pub n_omega: usize,
    /// Epsilon hairs.
    pub n_epsilon: usize,
}

impl ComponentParams {
    /// Creates a component tuple.
    pub const fn new(
        n_vertices: usize,
        n_loops: usize,
        n_numbered: usize,
        n_omega: usize,
        n_epsilon: usize,
    ) -> Self {
        Self {
            n_vertices,
            n_loops,
            n_numbered,
            n_omega,
            n_epsilon,
        }
    }

    /// Hairs of any decoration.
    pub fn n_hairs(&self) -> usize {
        self.n_numbered + self.n_omega + self.n_epsilon
    }

    /// Inner edges; a double leg has none.
    pub fn n_edges(&self) -> usize {
        if self.n_vertices > 0 {
            self.n_loops + self.n_vertices - 1
        } else {
            0
        }
    }

    /// Vertex blocks of graphs in this space.
    pub fn layout(&self) -> Layout {
        Layout::new(self.n_vertices, self.n_numbered, self.n_omega, self.n_epsilon)
    }

    /// Whether the tuple can carry graphs at all.
    pub fn is_valid(&self) -> bool {
        let vertices = self.n_vertices as i64;
        let edges = self.n_edges() as i64;
        let hairs = self.n_hairs() as i64;
        3 * vertices <= 2 * edges + hairs
            && edges <= max_edges(self.n_vertices)
            && (self.n_omega >= 1 || self.n_epsilon >= 1)
            && (self.n_vertices > 0 || self.n_hairs() == 2)
    }

    /// Stem used for persisted bases.
    pub fn file_stem(&self) -> String {
        format!(
            "wo_comp_gra{}_{}_{}_{}_{}",
            self.n_vertices, self.n_loops, self.n_numbered, self.n_omega, self.n_epsilon
        )
    }
}

/// A disjoint union of `n_components` connected pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AggregatedParams {
    /// Connected components, double legs included.
    pub n_components: usize,
    /// Internal vertices over all components.
    pub n_vertices: usize,
    /// Genus of the glued graph.
    pub genus: usize,
    /// Numbered legs.
    pub n_numbered: usize,
    /// Omega hairs.
    pub n_omega: usize,
    /// Epsilon hairs.
    pub n_epsilon: usize,
    /// Components made of two hairs joined by an edge.
    pub n_double_legs: usize,
}

impl AggregatedParams {
    /// Creates an aggregated tuple.
    pub const fn new(
        n_components: usize,
        n_vertices: usize,
        genus: usize,
        n_numbered: usize,
        n_omega: usize,
        n_epsilon: usize,
        n_double_legs: usize,
    ) -> Self {
        Self {
            n_components,
            n_vertices,
            genus,
            n_numbered,
            n_omega,
            n_epsilon,
            n_double_legs,
        }
    }

    /// Hairs of any decoration.
    pub fn n_hairs(&self) -> usize {
        self.n_numbered + self.n_omega + self.n_epsilon
    }

    /// Internal vertices plus hairs.
    pub fn total_vertices(&self) -> usize {
        self.n_vertices + self.n_hairs()
    }

    /// Inner edges, `genus + V + n + DL - hairs - 1`.
    pub fn n_edges(&self) -> i64 {
        self.genus as i64 + self.n_vertices as i64 + self.n_numbered as i64
            + self.n_double_legs as i64
            - self.n_hairs() as i64
            - 1
    }

    /// Loop order of the inner graph summed over components.
    pub fn n_loops(&self) -> i64 {
        self.n_edges() - self.n_vertices as i64 + self.n_components as i64
            - self.n_double_legs as i64
    }

    /// Edges of a graph in this space: inner edges plus hair edges, one per double leg.
    pub fn n_graph_edges(&self) -> i64 {
        self.n_edges() + self.n_hairs() as i64 - self.n_double_legs as i64
    }

    /// See [`excess`].
    pub fn excess(&self) -> i64 {
        excess(self.genus, self.n_numbered, self.n_omega)
    }

    /// `22 + inner edges + ε - double legs`.
    pub fn cohom_degree(&self) -> i64 {
        22 + self.n_edges() + self.n_epsilon as i64 - self.n_double_legs as i64
    }

    /// Vertex blocks of graphs in this space.
    pub fn layout(&self) -> Layout {
        Layout::new(self.n_vertices, self.n_numbered, self.n_omega, self.n_epsilon)
    }

    /// The component tuple describing a single-component space.
    pub fn as_component(&self) -> Option<ComponentParams> {
        if self.n_components != 1 {
            return None;
        }
        let loops = usize::try_from(self.n_loops()).ok()?;
        Some(ComponentParams::new(
            self.n_vertices,
            loops,
            self.n_numbered,
            self.n_omega,
            self.n_epsilon,
        ))
    }

    /// Whether the tuple can carry graphs at all.
    pub fn is_valid(&self) -> bool {
        let c = self.n_components as i64;
        let v = self.n_vertices as i64;
        let dl = self.n_double_legs as i64;
        let eps = self.n_epsilon as i64;
        let omega = self.n_omega as i64;
        let hairs = self.n_hairs() as i64;
        let edges = self.n_edges();
        let loops = self.n_loops();
        let excess = self.excess();

        if c < 1 || self.genus < 1 || edges < 0 || loops < 0 || excess < 0 {
            return false;
        }
        if dl > c || v < c - dl {
            return false;
        }
        if c == dl && (v != 0 || hairs != 2 * dl || loops != 0 || edges != 0) {
            return false;
        }
        // Every component touches an omega or an epsilon.
        if omega + eps < c {
            return false;
        }
        if 3 * v > 2 * edges + (hairs - 2 * dl) || edges > max_edges(self.n_vertices) {
            return false;
        }
        if 2 * dl > hairs || c - dl > self.total_vertices() as i64 - 2 * dl {
            return false;
        }
        // Two epsilons on one vertex are swapped by an odd automorphism.
        if eps > 2 * dl + v || eps > excess {
            return false;
        }
        if v == 1 && c == 1 && eps == 0 {
            let numbered = self.n_numbered as i64;
            if dl != 0
                || (excess - omega + 3) % 2 != 0
                || excess != omega - 3 + 2 * numbered
                || omega + numbered < 3
            {
                return false;
            }
        }
        if excess <= 4 && loops != 0 {
            return false;
        }
        true
    }

    /// Stem used for persisted bases.
    pub fn file_stem(&self) -> String {
        format!(
            "wo_agg_gra{}_{}_{}_{}_{}_{}_{}",
            self.n_components,
            self.n_vertices,
            self.genus,
            self.n_numbered,
            self.n_omega,
            self.n_epsilon,
            self.n_double_legs
        )
    }
}

/// All graphs of a given genus, leg counts and cohomological degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FinalParams {
    /// Genus.
    pub genus: usize,
    /// Numbered legs.
    pub n_numbered: usize,
    /// Omega hairs.
    pub n_omega: usize,
    /// Cohomological degree.
    pub degree: usize,
}

impl FinalParams {
    /// Creates a final tuple.
    pub const fn new(genus: usize, n_numbered: usize, n_omega: usize, degree: usize) -> Self {
        Self {
            genus,
            n_numbered,
            n_omega,
            degree,
        }
    }

    /// Internal vertices, `degree - 22 + ω - genus + 1`.
    pub fn n_vertices(&self) -> i64 {
        self.degree as i64 - 22 + self.n_omega as i64 - self.genus as i64 + 1
    }

    /// See [`excess`].
    pub fn excess(&self) -> i64 {
        excess(self.genus, self.n_numbered, self.n_omega)
    }

    /// Upper bound on epsilon hairs: at most one epsilon double leg, and otherwise
    /// one epsilon per vertex or other hair.
    pub fn max_epsilon(&self) -> usize {
        let vertices = usize::try_from(self.n_vertices()).unwrap_or(0);
        2 + vertices + self.n_numbered + self.n_omega
    }

    /// Whether the tuple can carry graphs at all.
    pub fn is_valid(&self) -> bool {
        self.genus >= 1 && self.n_vertices() >= 0
    }

    /// Layout of a graph with `order` vertices; the epsilon block takes the remainder.
    pub fn layout_for_order(&self, order: usize) -> Result<Layout, WohError> {
        let vertices = usize::try_from(self.n_vertices()).unwrap_or(0);
        Layout::with_epsilon_from_order(vertices, self.n_numbered, self.n_omega, order)
    }

    /// Stem used for persisted bases.
    pub fn file_stem(&self) -> String {
        format!(
            "wo_fin_gra{}_{}_{}_{}",
            self.genus, self.n_numbered, self.n_omega, self.degree
        )
    }
}

/// Identity of any graph vector space, used as memo and store key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpaceKey {
    /// A connected piece.
    Component(ComponentParams),
    /// A union of pieces.
    Aggregated(AggregatedParams),
    /// A fixed-degree space.
    Final(FinalParams),
}

impl SpaceKey {
    /// Stem used for persisted bases.
    pub fn file_stem(&self) -> String {
        match self {
            SpaceKey::Component(params) => params.file_stem(),
            SpaceKey::Aggregated(params) => params.file_stem(),
            SpaceKey::Final(params) => params.file_stem(),
        }
    }

    /// Validity of the underlying tuple.
    pub fn is_valid(&self) -> bool {
        match self {
            SpaceKey::Component(params) => params.is_valid(),
            SpaceKey::Aggregated(params) => params.is_valid(),
            SpaceKey::Final(params) => params.is_valid(),
        }
    }
}

impl fmt::Display for SpaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_identity_holds_for_final_tuples() {
        let fin = FinalParams::new(5, 6, 11, 18);
        for eps in 0..4 {
            for dl in 0..3 {
                let agg = AggregatedParams::new(
                    3,
                    fin.n_vertices() as usize,
                    fin.genus,
                    fin.n_numbered,
                    fin.n_omega,
                    eps,
                    dl,
                );
                assert_eq!(agg.cohom_degree(), fin.degree as i64);
            }
        }
    }

    #[test]
    fn file_stems_follow_tuple_order() {
        assert_eq!(ComponentParams::new(1, 0, 2, 1, 0).file_stem(), "wo_comp_gra1_0_2_1_0");
        assert_eq!(
            AggregatedParams::new(2, 0, 1, 2, 2, 0, 2).file_stem(),
            "wo_agg_gra2_0_1_2_2_0_2"
        );
        assert_eq!(FinalParams::new(7, 2, 11, 20).file_stem(), "wo_fin_gra7_2_11_20");
    }
}
