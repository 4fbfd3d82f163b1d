use serde::{Deserialize, Serialize};
use woh_core::errors::{ErrorInfo, WohError};

use crate::canon::canonical_form;
use crate::graph::Graph;
use crate::graph6;
use crate::layout::Layout;
use crate::orientation::perm_sign;

/// Canonical representative of a decorated graph together with orientation data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalImage {
    /// graph6 string of the canonical graph; the identity of a basis element.
    pub code: String,
    /// Canonical graph with edges labeled in sorted order.
    pub graph: Graph,
    /// `labeling[v]` is the canonical position of input vertex `v`.
    pub labeling: Vec<usize>,
    /// Orientation sign of the canonical relabeling.
    pub sign: i32,
    /// Whether an automorphism respecting the layout reverses the orientation.
    pub odd_automorphism: bool,
}

fn check_cover(graph: &Graph, layout: &Layout) -> Result<(), WohError> {
    if layout.order() != graph.order() {
        return Err(WohError::Graph(
            ErrorInfo::new("layout-mismatch", "layout does not cover the graph")
                .with_context("order", graph.order().to_string())
                .with_context("layout", layout.to_string()),
        ));
    }
    Ok(())
}

/// Canonicalizes `graph` against the partition of `layout`.
///
/// The returned sign expresses the input graph's orientation (sorted edges, omegas in
/// vertex order) in terms of the canonical graph's orientation.
pub fn canonical_image(graph: &Graph, layout: &Layout) -> Result<CanonicalImage, WohError> {
    check_cover(graph, layout)?;
    let form = canonical_form(graph, &layout.partition())?;
    let sign = perm_sign(graph, layout, &form.labeling)?;
    let mut odd_automorphism = false;
    for generator in &form.generators {
        if perm_sign(graph, layout, generator)? == -1 {
            odd_automorphism = true;
            break;
        }
    }
    Ok(CanonicalImage {
        code: graph6::encode(&form.graph),
        graph: form.graph,
        labeling: form.labeling,
        sign,
        odd_automorphism,
    })
}

/// A graph together with the layout of its vertex blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedGraph {
    graph: Graph,
    layout: Layout,
}

impl DecoratedGraph {
    /// Pairs a graph with its layout; the layout must cover every vertex.
    pub fn new(graph: Graph, layout: Layout) -> Result<Self, WohError> {
        check_cover(&graph, &layout)?;
        Ok(Self { graph, layout })
    }

    /// Decodes a graph6 string under the given layout.
    pub fn from_graph6(code: &str, layout: Layout) -> Result<Self, WohError> {
        Self::new(graph6::decode(code)?, layout)
    }

    /// Underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Block layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Orientation sign of relabeling by `p`.
    pub fn perm_sign(&self, p: &[usize]) -> Result<i32, WohError> {
        perm_sign(&self.graph, &self.layout, p)
    }

    /// Canonical representative and sign.
    pub fn canonicalize(&self) -> Result<CanonicalImage, WohError> {
        canonical_image(&self.graph, &self.layout)
    }

    /// Whether the graph vanishes by an orientation-reversing automorphism.
    pub fn has_odd_automorphism(&self) -> Result<bool, WohError> {
        Ok(self.canonicalize()?.odd_automorphism)
    }

    /// graph6 string of the graph as stored, not canonicalized.
    pub fn to_graph6(&self) -> String {
        graph6::encode(&self.graph)
    }
}
