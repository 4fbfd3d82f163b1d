use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use woh_core::errors::{ErrorInfo, WohError};

/// Kind of a vertex determined by the block it falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// Internal vertex, unordered among its block.
    Internal,
    /// Numbered leg with its index `0..n_numbered`.
    Numbered(usize),
    /// Odd hair decoration.
    Omega,
    /// Even hair decoration.
    Epsilon,
}

/// Four consecutive vertex blocks: internal, numbered, omega and epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    /// Number of internal vertices.
    pub n_internal: usize,
    /// Number of numbered legs.
    pub n_numbered: usize,
    /// Number of omega hairs.
    pub n_omega: usize,
    /// Number of epsilon hairs.
    pub n_epsilon: usize,
}

impl Layout {
    /// Creates a layout from its four block sizes.
    pub const fn new(n_internal: usize, n_numbered: usize, n_omega: usize, n_epsilon: usize) -> Self {
        Self {
            n_internal,
            n_numbered,
            n_omega,
            n_epsilon,
        }
    }

    /// Recovers the epsilon block from the total vertex count.
    pub fn with_epsilon_from_order(
        n_internal: usize,
        n_numbered: usize,
        n_omega: usize,
        order: usize,
    ) -> Result<Self, WohError> {
        let fixed = n_internal + n_numbered + n_omega;
        let n_epsilon = order.checked_sub(fixed).ok_or_else(|| {
            WohError::Graph(
                ErrorInfo::new("order-below-layout", "graph has fewer vertices than its fixed blocks")
                    .with_context("order", order.to_string())
                    .with_context("fixed", fixed.to_string()),
            )
        })?;
        Ok(Self::new(n_internal, n_numbered, n_omega, n_epsilon))
    }

    /// Total number of vertices.
    pub fn order(&self) -> usize {
        self.n_internal + self.n_hairs()
    }

    /// Number of hair vertices of any kind.
    pub fn n_hairs(&self) -> usize {
        self.n_numbered + self.n_omega + self.n_epsilon
    }

    /// Internal block.
    pub fn internal_range(&self) -> Range<usize> {
        0..self.n_internal
    }

    /// Numbered block.
    pub fn numbered_range(&self) -> Range<usize> {
        let start = self.n_internal;
        start..start + self.n_numbered
    }

    /// Omega block.
    pub fn omega_range(&self) -> Range<usize> {
        let start = self.n_internal + self.n_numbered;
        start..start + self.n_omega
    }

    /// Epsilon block.
    pub fn epsilon_range(&self) -> Range<usize> {
        let start = self.n_internal + self.n_numbered + self.n_omega;
        start..start + self.n_epsilon
    }

    /// Kind of vertex `v`, or `None` when `v` lies outside the layout.
    pub fn kind_of(&self, v: usize) -> Option<VertexKind> {
        if self.internal_range().contains(&v) {
            Some(VertexKind::Internal)
        } else if self.numbered_range().contains(&v) {
            Some(VertexKind::Numbered(v - self.n_internal))
        } else if self.omega_range().contains(&v) {
            Some(VertexKind::Omega)
        } else if self.epsilon_range().contains(&v) {
            Some(VertexKind::Epsilon)
        } else {
            None
        }
    }

    /// Ordered vertex partition respected by canonical labeling.
    ///
    /// Internal, omega and epsilon blocks form one cell each; every numbered leg is
    /// a singleton cell. Empty blocks are omitted.
    pub fn partition(&self) -> Vec<Vec<usize>> {
        let mut cells = Vec::with_capacity(self.n_numbered + 3);
        if self.n_internal > 0 {
            cells.push(self.internal_range().collect());
        }
        cells.extend(self.numbered_range().map(|v| vec![v]));
        if self.n_omega > 0 {
            cells.push(self.omega_range().collect());
        }
        if self.n_epsilon > 0 {
            cells.push(self.epsilon_range().collect());
        }
        cells
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "internal={} numbered={} omega={} epsilon={}",
            self.n_internal, self.n_numbered, self.n_omega, self.n_epsilon
        )
    }
}
