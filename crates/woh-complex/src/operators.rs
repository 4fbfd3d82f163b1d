//! The two differentials between final spaces and their graph-level rules.
//!
//! An image term `(graph, sign)` carries edge labels inherited from the domain graph
//! (enumerated in sorted order). The sign already includes the reordering from those
//! labels to the image's own sorted edge order, so re-expressing the term in the
//! target basis only needs the canonical relabeling sign.

use std::fmt;

use serde::{Deserialize, Serialize};
use woh_core::errors::{ErrorInfo, WohError};
use woh_graph::perm::transposition;
use woh_graph::{edge_label_sign, Graph, Layout, VertexKind};

use crate::params::FinalParams;

/// The two differentials of the complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Differential {
    /// Contracts an edge at an internal vertex; degree drops by one.
    #[serde(rename = "contract")]
    ContractEdges,
    /// Turns one epsilon hair into an omega hair; degree drops by one.
    #[serde(rename = "eps_to_omega")]
    EpsToOmega,
}

impl Differential {
    /// Both differentials.
    pub const ALL: [Differential; 2] = [Differential::ContractEdges, Differential::EpsToOmega];

    /// Target tuple of the operator starting at `domain`, if there is one.
    pub fn target(&self, domain: &FinalParams) -> Option<FinalParams> {
        let degree = domain.degree.checked_sub(1)?;
        Some(match self {
            Differential::ContractEdges => {
                FinalParams::new(domain.genus, domain.n_numbered, domain.n_omega, degree)
            }
            Differential::EpsToOmega => {
                FinalParams::new(domain.genus, domain.n_numbered, domain.n_omega + 1, degree)
            }
        })
    }

    /// Domain tuple of the operator ending at `target`, if there is one.
    pub fn source(&self, target: &FinalParams) -> Option<FinalParams> {
        let degree = target.degree + 1;
        match self {
            Differential::ContractEdges => Some(FinalParams::new(
                target.genus,
                target.n_numbered,
                target.n_omega,
                degree,
            )),
            Differential::EpsToOmega => {
                let n_omega = target.n_omega.checked_sub(1)?;
                Some(FinalParams::new(target.genus, target.n_numbered, n_omega, degree))
            }
        }
    }

    /// Adjacency predicate between domain and target.
    pub fn is_match(&self, domain: &FinalParams, target: &FinalParams) -> bool {
        self.target(domain).as_ref() == Some(target)
    }

    /// Stem prefix of persisted matrices.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Differential::ContractEdges => "contractD",
            Differential::EpsToOmega => "epstowD",
        }
    }

    /// Configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Differential::ContractEdges => "contract",
            Differential::EpsToOmega => "eps_to_omega",
        }
    }

    /// Signed image of a basis graph of `domain`.
    pub fn operate_on(&self, graph: &Graph, domain: &FinalParams) -> Result<Vec<(Graph, i32)>, WohError> {
        let layout = domain.layout_for_order(graph.order())?;
        match self {
            Differential::ContractEdges => contract_edges(graph, &layout),
            Differential::EpsToOmega => eps_to_omega(graph, &layout),
        }
    }
}

impl fmt::Display for Differential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of one operator matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperatorKey {
    /// Which differential.
    pub differential: Differential,
    /// Domain tuple; the target follows from the differential.
    pub domain: FinalParams,
}

impl OperatorKey {
    /// Stem used for persisted matrices.
    pub fn file_stem(&self) -> String {
        format!(
            "{}{}_{}_{}_{}",
            self.differential.file_prefix(),
            self.domain.genus,
            self.domain.n_numbered,
            self.domain.n_omega,
            self.domain.degree
        )
    }
}

impl fmt::Display for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}

/// A differential restricted to one pair of adjacent final spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphOperator {
    differential: Differential,
    domain: FinalParams,
    target: FinalParams,
}

impl GraphOperator {
    /// Fails with an operator error when the spaces are not adjacent under `differential`.
    pub fn new(differential: Differential, domain: FinalParams, target: FinalParams) -> Result<Self, WohError> {
        if !differential.is_match(&domain, &target) {
            return Err(WohError::Operator(
                ErrorInfo::new("match-mismatch", "spaces are not adjacent under this differential")
                    .with_context("differential", differential.name())
                    .with_context("domain", domain.file_stem())
                    .with_context("target", target.file_stem()),
            ));
        }
        Ok(Self {
            differential,
            domain,
            target,
        })
    }

    /// Operator from `domain` to its adjacent space.
    pub fn generate(differential: Differential, domain: FinalParams) -> Result<Self, WohError> {
        let target = differential.target(&domain).ok_or_else(|| {
            WohError::Operator(
                ErrorInfo::new("no-target", "degree zero has no target")
                    .with_context("domain", domain.file_stem()),
            )
        })?;
        Self::new(differential, domain, target)
    }

    /// Memo and store key.
    pub fn key(&self) -> OperatorKey {
        OperatorKey {
            differential: self.differential,
            domain: self.domain,
        }
    }

    /// Which differential.
    pub fn differential(&self) -> Differential {
        self.differential
    }

    /// Domain tuple.
    pub fn domain(&self) -> &FinalParams {
        &self.domain
    }

    /// Target tuple.
    pub fn target(&self) -> &FinalParams {
        &self.target
    }

    /// Signed image of a domain basis graph.
    pub fn operate_on(&self, graph: &Graph) -> Result<Vec<(Graph, i32)>, WohError> {
        self.differential.operate_on(graph, &self.domain)
    }
}

fn parity_sign(k: usize) -> i32 {
    if k % 2 == 0 {
        1
    } else {
        -1
    }
}

/// Detaches every remaining edge at `u` onto a fresh epsilon leaf at the other end.
fn fan_out(graph: &Graph, u: usize) -> Result<Graph, WohError> {
    let mut out = graph.clone();
    for s in graph.neighbors(u) {
        let label = out.edge_label(u, s).ok_or_else(|| {
            WohError::Sign(ErrorInfo::new("missing-edge", "fan-out edge vanished"))
        })?;
        out = out.without_edge(u, s).with_leaf(s, label)?;
    }
    Ok(out)
}

/// Image of a contraction must have the target blocks and lose exactly the
/// contracted label.
fn check_contraction(
    image: &Graph,
    domain: &Graph,
    contracted: usize,
    expected: &Layout,
) -> Result<(), WohError> {
    if image.order() != expected.order() {
        return Err(WohError::Sign(
            ErrorInfo::new("contraction-order", "contracted graph does not fit the target blocks")
                .with_context("order", image.order().to_string())
                .with_context("expected", expected.to_string()),
        ));
    }
    let mut labels = image.labels();
    labels.sort_unstable();
    let mut remaining = domain.labels();
    remaining.retain(|&label| label != contracted);
    remaining.sort_unstable();
    if labels != remaining {
        return Err(WohError::Sign(
            ErrorInfo::new("contraction-labels", "contraction did not remove exactly one edge label")
                .with_context("contracted", contracted.to_string()),
        ));
    }
    Ok(())
}

/// Contracts every edge `(u, v)` with `u` internal and `v` internal, omega or epsilon.
///
/// Terms pick up `(-1)^index` for the contracted edge's position in the sorted edge
/// order. Contractions that would create a repeated edge vanish.
fn contract_edges(graph: &Graph, layout: &Layout) -> Result<Vec<(Graph, i32)>, WohError> {
    let enumerated = graph.enumerate_edges();
    let mut image = Vec::new();
    for (index, edge) in enumerated.edges().iter().enumerate() {
        let (u, v) = (edge.u, edge.v);
        if layout.kind_of(u) != Some(VertexKind::Internal) {
            continue;
        }
        let sign = parity_sign(index);
        let degree = enumerated.degree(u);
        match layout.kind_of(v) {
            Some(VertexKind::Internal) => {
                let Some(merged) = enumerated.merge_vertices(v, u) else {
                    continue;
                };
                let expected = Layout::new(
                    layout.n_internal - 1,
                    layout.n_numbered,
                    layout.n_omega,
                    layout.n_epsilon,
                );
                check_contraction(&merged, &enumerated, edge.label, &expected)?;
                let term_sign = sign * edge_label_sign(&merged);
                image.push((merged, term_sign));
            }
            Some(VertexKind::Epsilon) => {
                let opened = enumerated.without_edge(u, v);
                let contracted = fan_out(&opened, u)?.without_vertex(v).without_vertex(u);
                let expected = Layout::new(
                    layout.n_internal - 1,
                    layout.n_numbered,
                    layout.n_omega,
                    layout.n_epsilon - 1 + (degree - 1),
                );
                check_contraction(&contracted, &enumerated, edge.label, &expected)?;
                let term_sign = sign * edge_label_sign(&contracted);
                image.push((contracted, term_sign));
            }
            Some(VertexKind::Omega) => {
                let opened = enumerated.without_edge(u, v);
                // One term per neighbor taking over the omega hair.
                for w in opened.neighbors(u) {
                    let expected = Layout::new(
                        layout.n_internal - 1,
                        layout.n_numbered,
                        layout.n_omega,
                        layout.n_epsilon + degree - 2,
                    );
                    let moved = opened.move_edge((u, w), (w, v))?;
                    let contracted = fan_out(&moved, u)?.without_vertex(u);
                    check_contraction(&contracted, &enumerated, edge.label, &expected)?;
                    let term_sign = sign * edge_label_sign(&contracted);
                    image.push((contracted, term_sign));
                }
            }
            _ => {}
        }
    }
    Ok(image)
}

/// Moves each epsilon hair in turn to the first epsilon slot, where it becomes the
/// last omega hair of the target.
fn eps_to_omega(graph: &Graph, layout: &Layout) -> Result<Vec<(Graph, i32)>, WohError> {
    let enumerated = graph.enumerate_edges();
    let global = parity_sign(enumerated.size() + layout.n_epsilon + 1);
    let cutoff = layout.epsilon_range().start;
    let mut image = Vec::with_capacity(layout.n_epsilon);
    for j in 0..layout.n_epsilon {
        let swap = transposition(graph.order(), cutoff, cutoff + j);
        let moved = enumerated.relabel(&swap)?;
        let term_sign = global * edge_label_sign(&moved);
        image.push((moved, term_sign));
    }
    Ok(image)
}
