use std::collections::BTreeMap;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use woh_core::errors::{ErrorInfo, WohError};
use woh_graph::DecoratedGraph;

use crate::operators::GraphOperator;
use crate::space::Basis;

/// One non-zero coefficient of an operator matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatrixEntry {
    /// Domain basis index.
    pub domain: usize,
    /// Target basis index.
    pub target: usize,
    /// Integer coefficient, never zero.
    pub coefficient: i64,
}

/// Sparse integer matrix of a linear map between two bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorMatrix {
    domain_dim: usize,
    target_dim: usize,
    entries: Vec<MatrixEntry>,
}

fn algebra_error(code: &str, message: &str) -> WohError {
    WohError::Algebra(ErrorInfo::new(code, message))
}

impl OperatorMatrix {
    /// The zero map.
    pub fn zero(domain_dim: usize, target_dim: usize) -> Self {
        Self {
            domain_dim,
            target_dim,
            entries: Vec::new(),
        }
    }

    /// Sums duplicate positions, drops zeros and sorts by `(domain, target)`.
    pub fn new(
        domain_dim: usize,
        target_dim: usize,
        entries: impl IntoIterator<Item = MatrixEntry>,
    ) -> Result<Self, WohError> {
        let mut cells: BTreeMap<(usize, usize), i64> = BTreeMap::new();
        for entry in entries {
            if entry.domain >= domain_dim || entry.target >= target_dim {
                return Err(WohError::Algebra(
                    ErrorInfo::new("entry-out-of-range", "matrix entry outside its shape")
                        .with_context("entry", format!("({}, {})", entry.domain, entry.target))
                        .with_context("shape", format!("{domain_dim}x{target_dim}")),
                ));
            }
            let cell = cells.entry((entry.domain, entry.target)).or_insert(0);
            *cell = cell
                .checked_add(entry.coefficient)
                .ok_or_else(|| algebra_error("coefficient-overflow", "matrix coefficient overflows i64"))?;
        }
        let entries = cells
            .into_iter()
            .filter(|(_, coefficient)| *coefficient != 0)
            .map(|((domain, target), coefficient)| MatrixEntry {
                domain,
                target,
                coefficient,
            })
            .collect();
        Ok(Self {
            domain_dim,
            target_dim,
            entries,
        })
    }

    /// Domain dimension.
    pub fn domain_dim(&self) -> usize {
        self.domain_dim
    }

    /// Target dimension.
    pub fn target_dim(&self) -> usize {
        self.target_dim
    }

    /// Non-zero entries sorted by `(domain, target)`.
    pub fn entries(&self) -> &[MatrixEntry] {
        &self.entries
    }

    /// Whether every coefficient vanishes.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether either side is zero-dimensional.
    pub fn is_trivial(&self) -> bool {
        self.domain_dim == 0 || self.target_dim == 0
    }

    /// Composite map: `self` first, then `second`.
    pub fn then(&self, second: &OperatorMatrix) -> Result<OperatorMatrix, WohError> {
        if self.target_dim != second.domain_dim {
            return Err(WohError::Algebra(
                ErrorInfo::new("shape-mismatch", "cannot compose matrices of incompatible shapes")
                    .with_context("first", format!("{}x{}", self.domain_dim, self.target_dim))
                    .with_context("second", format!("{}x{}", second.domain_dim, second.target_dim)),
            ));
        }
        let mut rows_of_second: BTreeMap<usize, Vec<&MatrixEntry>> = BTreeMap::new();
        for entry in &second.entries {
            rows_of_second.entry(entry.domain).or_default().push(entry);
        }
        let mut products = Vec::new();
        for entry in &self.entries {
            let Some(row) = rows_of_second.get(&entry.target) else {
                continue;
            };
            for next in row {
                let coefficient = entry
                    .coefficient
                    .checked_mul(next.coefficient)
                    .ok_or_else(|| algebra_error("coefficient-overflow", "matrix product overflows i64"))?;
                products.push(MatrixEntry {
                    domain: entry.domain,
                    target: next.target,
                    coefficient,
                });
            }
        }
        OperatorMatrix::new(self.domain_dim, second.target_dim, products)
    }
}

/// Applies `operator` to every domain basis graph and expresses each image term in
/// the target basis.
///
/// Terms whose canonical form has an odd automorphism are zero; terms outside the
/// target basis are dropped as well. Rows are computed in parallel and merged in
/// domain order, so the result does not depend on scheduling.
pub fn build_matrix(
    operator: &GraphOperator,
    domain: &Basis,
    target: &Basis,
) -> Result<OperatorMatrix, WohError> {
    let target_params = *operator.target();
    let graphs = domain.graphs()?;
    let mut rows = graphs
        .par_iter()
        .enumerate()
        .map(|(index, graph)| -> Result<(usize, Vec<MatrixEntry>, usize), WohError> {
            let mut row: BTreeMap<usize, i64> = BTreeMap::new();
            let mut unmatched = 0;
            for (image, sign) in operator.operate_on(graph)? {
                let layout = target_params.layout_for_order(image.order())?;
                let canonical = DecoratedGraph::new(image, layout)?.canonicalize()?;
                if canonical.odd_automorphism {
                    continue;
                }
                match target.index_of(&canonical.code) {
                    Some(column) => {
                        *row.entry(column).or_insert(0) += i64::from(sign * canonical.sign);
                    }
                    None => unmatched += 1,
                }
            }
            let entries = row
                .into_iter()
                .map(|(column, coefficient)| MatrixEntry {
                    domain: index,
                    target: column,
                    coefficient,
                })
                .collect();
            Ok((index, entries, unmatched))
        })
        .collect::<Result<Vec<_>, WohError>>()?;
    rows.sort_by_key(|(index, _, _)| *index);

    let unmatched: usize = rows.iter().map(|(_, _, unmatched)| unmatched).sum();
    if unmatched > 0 {
        debug!("operator {}: {unmatched} image terms outside the target basis", operator.key());
    }
    let matrix = OperatorMatrix::new(
        domain.dimension(),
        target.dimension(),
        rows.into_iter().flat_map(|(_, entries, _)| entries),
    )?;
    info!(
        "built matrix {}: shape={}x{} entries={}",
        operator.key(),
        matrix.domain_dim(),
        matrix.target_dim(),
        matrix.entries().len()
    );
    Ok(matrix)
}
