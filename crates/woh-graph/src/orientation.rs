//! The orientation sign shared by basis generation, aggregation and operators.
//!
//! A decorated graph is oriented by the wedge of its edges, taken in sorted edge order,
//! followed by the wedge of its omega hairs in vertex order. Epsilon and numbered hairs
//! are even and never contribute.

use woh_core::errors::{ErrorInfo, WohError};

use crate::graph::Graph;
use crate::layout::Layout;
use crate::perm::sequence_sign;

/// Sign relating the order given by the edge labels to the sorted edge order.
pub fn edge_label_sign(graph: &Graph) -> i32 {
    sequence_sign(&graph.labels())
}

/// Sign of relabeling `graph` by `p` (vertex `i` goes to `p[i]`).
///
/// Product of the induced permutation of the sorted edge order and of `p` restricted
/// to the omega block. Fails with a sign error when `p` is not a bijection or moves an
/// omega hair out of the omega block.
pub fn perm_sign(graph: &Graph, layout: &Layout, p: &[usize]) -> Result<i32, WohError> {
    if layout.order() != graph.order() {
        return Err(WohError::Sign(
            ErrorInfo::new("layout-mismatch", "layout does not cover the graph")
                .with_context("order", graph.order().to_string())
                .with_context("layout", layout.to_string()),
        ));
    }
    let relabeled = graph.enumerate_edges().relabel(p)?;
    let omega = layout.omega_range();
    let omega_images = &p[omega.clone()];
    if let Some(stray) = omega_images.iter().find(|image| !omega.contains(image)) {
        return Err(WohError::Sign(
            ErrorInfo::new("omega-block-escape", "relabeling moves an omega hair off the omega block")
                .with_context("image", stray.to_string())
                .with_context("layout", layout.to_string()),
        ));
    }
    Ok(edge_label_sign(&relabeled) * sequence_sign(omega_images))
}
