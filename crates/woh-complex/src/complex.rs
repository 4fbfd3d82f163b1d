//! A graph complex over a product of parameter ranges, with its bases, operator
//! matrices, square-zero check, ranks and cohomology.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{info, warn};
use rayon::prelude::*;
use woh_core::errors::WohError;

use crate::config::{ParamRange, RunConfig};
use crate::linalg::{rank, DEFAULT_PRIMES};
use crate::matrix::OperatorMatrix;
use crate::operators::{Differential, GraphOperator};
use crate::params::{FinalParams, SpaceKey};
use crate::report::{
    CohomologyEntry, CohomologyTable, DimensionTable, RankEntry, SquareZeroReport,
};
use crate::space::Basis;
use crate::session::Session;

/// Final spaces over `genus × n × ω × degree` together with the configured
/// differentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphComplex {
    genus: ParamRange,
    n_numbered: ParamRange,
    n_omega: ParamRange,
    degree: ParamRange,
    differentials: Vec<Differential>,
    primes: Vec<u64>,
}

impl GraphComplex {
    /// Complex using the default rank moduli.
    pub fn new(
        genus: ParamRange,
        n_numbered: ParamRange,
        n_omega: ParamRange,
        degree: ParamRange,
        differentials: Vec<Differential>,
    ) -> Self {
        Self {
            genus,
            n_numbered,
            n_omega,
            degree,
            differentials,
            primes: DEFAULT_PRIMES.to_vec(),
        }
    }

    /// Complex described by a run configuration.
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.genus,
            config.n_numbered,
            config.n_omega,
            config.degree,
            config.differentials.clone(),
        )
        .with_primes(config.rank_primes.clone())
    }

    /// Replaces the rank moduli.
    pub fn with_primes(mut self, primes: Vec<u64>) -> Self {
        self.primes = primes;
        self
    }

    /// Configured differentials.
    pub fn differentials(&self) -> &[Differential] {
        &self.differentials
    }

    /// Whether `params` lies inside the ranges.
    pub fn contains(&self, params: &FinalParams) -> bool {
        self.genus.contains(params.genus)
            && self.n_numbered.contains(params.n_numbered)
            && self.n_omega.contains(params.n_omega)
            && self.degree.contains(params.degree)
    }

    /// Every final tuple in the ranges, in lexicographic order.
    pub fn vector_spaces(&self) -> Vec<FinalParams> {
        let mut spaces = Vec::new();
        for genus in self.genus.values() {
            for n_numbered in self.n_numbered.values() {
                for n_omega in self.n_omega.values() {
                    for degree in self.degree.values() {
                        spaces.push(FinalParams::new(genus, n_numbered, n_omega, degree));
                    }
                }
            }
        }
        spaces
    }

    /// Builds every basis in parallel; `force` rebuilds the final spaces themselves.
    pub fn build_basis(&self, session: &Session, force: bool) -> Result<Vec<Arc<Basis>>, WohError> {
        let spaces = self.vector_spaces();
        let mut built = spaces
            .par_iter()
            .enumerate()
            .map(|(index, params)| -> Result<(usize, Arc<Basis>), WohError> {
                let key = SpaceKey::Final(*params);
                let basis = if force {
                    session.rebuild(&key)?
                } else {
                    session.basis(&key)?
                };
                Ok((index, basis))
            })
            .collect::<Result<Vec<_>, WohError>>()?;
        built.sort_by_key(|(index, _)| *index);
        let total: usize = built.iter().map(|(_, basis)| basis.dimension()).sum();
        info!("built {} final bases, total dimension {total}", built.len());
        Ok(built.into_iter().map(|(_, basis)| basis).collect())
    }

    /// Operators of `differential` whose domain and target both lie in the ranges.
    pub fn operators(&self, differential: Differential) -> Result<Vec<GraphOperator>, WohError> {
        self.vector_spaces()
            .into_iter()
            .filter_map(|domain| {
                let target = differential.target(&domain)?;
                self.contains(&target).then_some((domain, target))
            })
            .map(|(domain, target)| GraphOperator::new(differential, domain, target))
            .collect()
    }

    /// Builds the matrices of every configured differential.
    pub fn build_matrices(
        &self,
        session: &Session,
        force: bool,
    ) -> Result<Vec<(GraphOperator, Arc<OperatorMatrix>)>, WohError> {
        let mut operators = Vec::new();
        for &differential in &self.differentials {
            operators.extend(self.operators(differential)?);
        }
        let mut built = operators
            .par_iter()
            .enumerate()
            .map(|(index, operator)| -> Result<(usize, GraphOperator, Arc<OperatorMatrix>), WohError> {
                let matrix = if force {
                    session.rebuild_matrix(operator)?
                } else {
                    session.matrix(operator)?
                };
                Ok((index, *operator, matrix))
            })
            .collect::<Result<Vec<_>, WohError>>()?;
        built.sort_by_key(|(index, _, _)| *index);
        Ok(built
            .into_iter()
            .map(|(_, operator, matrix)| (operator, matrix))
            .collect())
    }

    /// Composes every pair of consecutive `differential` operators inside the ranges
    /// and records the pairs whose composite is non-zero.
    pub fn square_zero_test(
        &self,
        session: &Session,
        differential: Differential,
    ) -> Result<SquareZeroReport, WohError> {
        let mut report = SquareZeroReport {
            differential,
            tested: 0,
            trivial: 0,
            failures: Vec::new(),
        };
        for first in self.operators(differential)? {
            let Some(next_target) = differential.target(first.target()) else {
                continue;
            };
            if !self.contains(&next_target) {
                continue;
            }
            let second = GraphOperator::new(differential, *first.target(), next_target)?;
            let first_matrix = session.matrix(&first)?;
            let second_matrix = session.matrix(&second)?;
            report.tested += 1;
            if first_matrix.is_trivial() || second_matrix.is_trivial() {
                report.trivial += 1;
                continue;
            }
            if !first_matrix.then(&second_matrix)?.is_zero() {
                report.failures.push(first.key().file_stem());
            }
        }
        if report.tested == 0 {
            warn!("square-zero {differential}: no composable pair inside the ranges");
        }
        info!(
            "square-zero {differential}: tested={} trivial={} failures={}",
            report.tested,
            report.trivial,
            report.failures.len()
        );
        Ok(report)
    }

    /// Rank of every operator of every configured differential.
    pub fn compute_ranks(&self, session: &Session) -> Result<Vec<RankEntry>, WohError> {
        let mut operators = Vec::new();
        for &differential in &self.differentials {
            operators.extend(self.operators(differential)?);
        }
        let mut ranks = operators
            .par_iter()
            .enumerate()
            .map(|(index, operator)| -> Result<(usize, RankEntry), WohError> {
                let matrix = session.matrix(operator)?;
                let entry = RankEntry {
                    operator: operator.key().file_stem(),
                    differential: operator.differential(),
                    domain: *operator.domain(),
                    shape: (matrix.domain_dim(), matrix.target_dim()),
                    rank: rank(&matrix, &self.primes)?,
                    moduli: self.primes.clone(),
                };
                Ok((index, entry))
            })
            .collect::<Result<Vec<_>, WohError>>()?;
        ranks.sort_by_key(|(index, _)| *index);
        Ok(ranks.into_iter().map(|(_, entry)| entry).collect())
    }

    /// Dimensions per `(genus, n, ω)` strand with their Euler characteristics.
    pub fn dimension_table(&self, session: &Session) -> Result<DimensionTable, WohError> {
        let mut dimensions = Vec::new();
        for params in self.vector_spaces() {
            let basis = session.basis(&SpaceKey::Final(params))?;
            dimensions.push((params, basis.dimension()));
        }
        Ok(DimensionTable::from_dimensions(dimensions))
    }

    /// Euler characteristic of each `(genus, n, ω)` strand over the degree range.
    pub fn euler_characteristics(
        &self,
        session: &Session,
    ) -> Result<BTreeMap<(usize, usize, usize), i64>, WohError> {
        Ok(self
            .dimension_table(session)?
            .rows
            .into_iter()
            .map(|row| ((row.genus, row.n_numbered, row.n_omega), row.euler_characteristic))
            .collect())
    }

    /// `dim − rank(in) − rank(out)` for every space under `differential`.
    ///
    /// Ranks are taken modulo the configured primes, so each value bounds the
    /// rational cohomology from above.
    ///
    /// A map to or from a valid space outside the ranges is taken as zero and the
    /// entry is marked incomplete.
    pub fn cohomology(
        &self,
        session: &Session,
        differential: Differential,
    ) -> Result<CohomologyTable, WohError> {
        let mut entries = Vec::new();
        for space in self.vector_spaces() {
            let dimension = session.basis(&SpaceKey::Final(space))?.dimension();
            let mut complete = true;

            let rank_out = match differential.target(&space) {
                Some(target) if self.contains(&target) => {
                    self.operator_rank(session, differential, space, target)?
                }
                Some(target) => {
                    complete &= !target.is_valid();
                    0
                }
                None => 0,
            };
            let rank_in = match differential.source(&space) {
                Some(source) if self.contains(&source) => {
                    self.operator_rank(session, differential, source, space)?
                }
                Some(source) => {
                    complete &= !source.is_valid();
                    0
                }
                None => 0,
            };
            entries.push(CohomologyEntry::new(space, dimension, rank_in, rank_out, complete));
        }
        Ok(CohomologyTable {
            differential,
            entries,
            rank_moduli: self.primes.clone(),
        })
    }

    fn operator_rank(
        &self,
        session: &Session,
        differential: Differential,
        domain: FinalParams,
        target: FinalParams,
    ) -> Result<usize, WohError> {
        let operator = GraphOperator::new(differential, domain, target)?;
        let matrix = session.matrix(&operator)?;
        rank(&matrix, &self.primes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complex() -> GraphComplex {
        GraphComplex::new(
            ParamRange::single(3),
            ParamRange::single(2),
            ParamRange::new(11, 12),
            ParamRange::new(14, 16),
            Differential::ALL.to_vec(),
        )
    }

    #[test]
    fn spaces_cover_the_product() {
        let spaces = complex().vector_spaces();
        assert_eq!(spaces.len(), 6);
        assert_eq!(spaces[0], FinalParams::new(3, 2, 11, 14));
        assert_eq!(spaces[5], FinalParams::new(3, 2, 12, 16));
    }

    #[test]
    fn operators_stay_inside_the_ranges() {
        let c = complex();
        assert_eq!(c.operators(Differential::ContractEdges).unwrap().len(), 4);
        let eps = c.operators(Differential::EpsToOmega).unwrap();
        assert_eq!(eps.len(), 2);
        assert!(eps.iter().all(|op| op.domain().n_omega == 11));
    }
}
