use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use woh_core::errors::WohError;

use crate::operators::Differential;
use crate::params::{excess, FinalParams, SpaceKey};
use crate::serde::to_canonical_json_bytes;
use crate::session::Session;

/// First omega count of the weight-11 complexes.
pub const FIRST_OMEGA: usize = 11;

/// Number of consecutive degrees summed per omega value.
pub const DEGREE_SPAN: usize = 15;

/// `Σ (−1)^degree · dim` over `(degree, dimension)` pairs.
pub fn euler_characteristic(dimensions: impl IntoIterator<Item = (usize, usize)>) -> i64 {
    dimensions
        .into_iter()
        .map(|(degree, dimension)| {
            let dimension = dimension as i64;
            if degree % 2 == 0 {
                dimension
            } else {
                -dimension
            }
        })
        .sum()
}

/// Dimensions of one `(genus, n, ω)` strand across degrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRow {
    /// Genus.
    pub genus: usize,
    /// Numbered legs.
    pub n_numbered: usize,
    /// Omega hairs.
    pub n_omega: usize,
    /// Basis dimension per degree.
    pub dimensions: BTreeMap<usize, usize>,
    /// Alternating sum of the dimensions.
    pub euler_characteristic: i64,
}

impl DimensionRow {
    /// Row from per-degree dimensions.
    pub fn new(
        genus: usize,
        n_numbered: usize,
        n_omega: usize,
        dimensions: BTreeMap<usize, usize>,
    ) -> Self {
        let euler_characteristic = euler_characteristic(dimensions.iter().map(|(&d, &n)| (d, n)));
        Self {
            genus,
            n_numbered,
            n_omega,
            dimensions,
            euler_characteristic,
        }
    }

    /// Dimension at `degree`, zero when absent.
    pub fn dimension(&self, degree: usize) -> usize {
        self.dimensions.get(&degree).copied().unwrap_or(0)
    }
}

/// Dimension rows ordered by `(genus, n, ω)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionTable {
    /// Rows.
    pub rows: Vec<DimensionRow>,
}

impl DimensionTable {
    /// Groups final dimensions into rows.
    pub fn from_dimensions(dimensions: impl IntoIterator<Item = (FinalParams, usize)>) -> Self {
        let mut grouped: BTreeMap<(usize, usize, usize), BTreeMap<usize, usize>> = BTreeMap::new();
        for (params, dimension) in dimensions {
            grouped
                .entry((params.genus, params.n_numbered, params.n_omega))
                .or_default()
                .insert(params.degree, dimension);
        }
        let rows = grouped
            .into_iter()
            .map(|((genus, n_numbered, n_omega), dims)| DimensionRow::new(genus, n_numbered, n_omega, dims))
            .collect();
        Self { rows }
    }

    /// Row of `(genus, n, ω)`.
    pub fn row(&self, genus: usize, n_numbered: usize, n_omega: usize) -> Option<&DimensionRow> {
        self.rows
            .iter()
            .find(|row| row.genus == genus && row.n_numbered == n_numbered && row.n_omega == n_omega)
    }
}

/// Rank of one operator matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    /// Matrix stem, e.g. `contractD5_6_11_18`.
    pub operator: String,
    /// Which differential.
    pub differential: Differential,
    /// Domain tuple.
    pub domain: FinalParams,
    /// Matrix shape as `(domain, target)` dimensions.
    pub shape: (usize, usize),
    /// Largest rank over `moduli`; a lower bound on the rank over the rationals.
    pub rank: usize,
    /// Primes the rank was taken modulo.
    pub moduli: Vec<u64>,
}

/// Cohomology of one final space under one differential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohomologyEntry {
    /// The space.
    pub space: FinalParams,
    /// Basis dimension.
    pub dimension: usize,
    /// Rank of the incoming map.
    pub rank_in: usize,
    /// Rank of the outgoing map.
    pub rank_out: usize,
    /// `dimension − rank_in − rank_out`.
    pub cohomology: i64,
    /// False when a neighbouring space lies outside the configured ranges and its
    /// map was taken as zero.
    pub complete: bool,
}

impl CohomologyEntry {
    /// Entry with the cohomology derived from the ranks.
    pub fn new(space: FinalParams, dimension: usize, rank_in: usize, rank_out: usize, complete: bool) -> Self {
        Self {
            space,
            dimension,
            rank_in,
            rank_out,
            cohomology: dimension as i64 - rank_in as i64 - rank_out as i64,
            complete,
        }
    }
}

/// Per-degree cohomology under one differential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohomologyTable {
    /// Which differential.
    pub differential: Differential,
    /// Entries ordered like the complex's spaces.
    pub entries: Vec<CohomologyEntry>,
    /// Primes the ranks were taken modulo. Ranks are lower bounds, so each entry is
    /// an upper bound on the rational cohomology.
    pub rank_moduli: Vec<u64>,
}

/// Outcome of composing consecutive operators of one differential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareZeroReport {
    /// Which differential.
    pub differential: Differential,
    /// Composable pairs examined.
    pub tested: usize,
    /// Pairs passing because one side is zero-dimensional.
    pub trivial: usize,
    /// Stems of first operators whose composite is non-zero.
    pub failures: Vec<String>,
}

impl SquareZeroReport {
    /// Whether every composite vanished.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Pairs whose composite vanished with both sides non-trivial.
    pub fn non_trivial_successes(&self) -> usize {
        self.tested - self.trivial - self.failures.len()
    }
}

/// Canonical JSON rendering of any report.
pub fn to_canonical_json<T: Serialize>(report: &T) -> Result<String, WohError> {
    let bytes = to_canonical_json_bytes(report)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Euler characteristic of the weight-11 strand `(genus, n)`, summed over
/// `ω = 11, 12, …` while the excess stays non-negative and over fifteen degrees
/// from `22 − ω + genus − 1`.
pub fn euler_characteristic_over_omega(
    session: &Session,
    genus: usize,
    n_numbered: usize,
) -> Result<i64, WohError> {
    let mut total = 0;
    let mut n_omega = FIRST_OMEGA;
    while excess(genus, n_numbered, n_omega) >= 0 {
        let degree_min = 22 + genus as i64 - 1 - n_omega as i64;
        let mut dimensions = Vec::with_capacity(DEGREE_SPAN);
        for offset in 0..DEGREE_SPAN as i64 {
            let Ok(degree) = usize::try_from(degree_min + offset) else {
                continue;
            };
            let key = SpaceKey::Final(FinalParams::new(genus, n_numbered, n_omega, degree));
            dimensions.push((degree, session.basis(&key)?.dimension()));
        }
        total += euler_characteristic(dimensions);
        n_omega += 1;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_sum() {
        assert_eq!(euler_characteristic([(14, 3), (15, 1), (16, 2)]), 4);
        assert_eq!(euler_characteristic([]), 0);
    }

    #[test]
    fn rows_group_by_strand() {
        let table = DimensionTable::from_dimensions([
            (FinalParams::new(3, 2, 11, 15), 2),
            (FinalParams::new(3, 2, 11, 16), 5),
            (FinalParams::new(3, 2, 12, 15), 1),
        ]);
        assert_eq!(table.rows.len(), 2);
        let row = table.row(3, 2, 11).unwrap();
        assert_eq!(row.euler_characteristic, 3);
        assert_eq!(row.dimension(17), 0);
    }

    #[test]
    fn cohomology_subtracts_ranks() {
        let entry = CohomologyEntry::new(FinalParams::new(2, 1, 11, 13), 7, 2, 3, true);
        assert_eq!(entry.cohomology, 2);
    }
}
