//! Exact rank of sparse integer matrices by elimination modulo primes.
//!
//! The rank modulo `p` never exceeds the rational rank, and equals it unless `p`
//! divides every maximal non-vanishing minor. Taking the maximum over a few large
//! primes is exact for the coefficient sizes produced by the differentials.

use std::collections::HashMap;

use woh_core::errors::{ErrorInfo, WohError};

use crate::matrix::OperatorMatrix;

/// Default moduli: `2^31 - 1` and `10^9 + 7`.
pub const DEFAULT_PRIMES: [u64; 2] = [2_147_483_647, 1_000_000_007];

/// Largest modulus for which products of residues fit in `u64`.
pub const MAX_MODULUS: u64 = 1 << 32;

/// Trial-division primality test.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

fn pow_mod(mut base: u64, mut exp: u64, p: u64) -> u64 {
    let mut acc = 1;
    base %= p;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc * base % p;
        }
        base = base * base % p;
        exp >>= 1;
    }
    acc
}

fn residue(value: i64, p: u64) -> u64 {
    value.rem_euclid(p as i64) as u64
}

type SparseRow = Vec<(usize, u64)>;

/// `row + factor * pivot` over sorted sparse rows, dropping zeros.
fn axpy(row: &[(usize, u64)], pivot: &[(usize, u64)], factor: u64, p: u64) -> SparseRow {
    let mut out = Vec::with_capacity(row.len() + pivot.len());
    let (mut i, mut j) = (0, 0);
    while i < row.len() || j < pivot.len() {
        let take_row = j >= pivot.len() || (i < row.len() && row[i].0 < pivot[j].0);
        let take_pivot = i >= row.len() || (j < pivot.len() && pivot[j].0 < row[i].0);
        if take_row {
            out.push(row[i]);
            i += 1;
        } else if take_pivot {
            out.push((pivot[j].0, factor * pivot[j].1 % p));
            j += 1;
        } else {
            let value = (row[i].1 + factor * pivot[j].1) % p;
            if value != 0 {
                out.push((row[i].0, value));
            }
            i += 1;
            j += 1;
        }
    }
    out
}

/// Rank of `matrix` modulo the prime `p`.
pub fn rank_mod_prime(matrix: &OperatorMatrix, p: u64) -> Result<usize, WohError> {
    if p >= MAX_MODULUS || !is_prime(p) {
        return Err(WohError::Algebra(
            ErrorInfo::new("bad-modulus", "rank modulus must be a prime below 2^32")
                .with_context("modulus", p.to_string()),
        ));
    }
    let mut rows: Vec<SparseRow> = vec![Vec::new(); matrix.domain_dim()];
    for entry in matrix.entries() {
        let value = residue(entry.coefficient, p);
        if value != 0 {
            rows[entry.domain].push((entry.target, value));
        }
    }

    // Pivot rows are normalized to a leading one and keyed by their leading column.
    let mut pivots: HashMap<usize, SparseRow> = HashMap::new();
    for mut row in rows {
        row.sort_unstable_by_key(|&(column, _)| column);
        while let Some(&(column, value)) = row.first() {
            match pivots.get(&column) {
                Some(pivot) => row = axpy(&row, pivot, p - value, p),
                None => {
                    let inverse = pow_mod(value, p - 2, p);
                    for cell in row.iter_mut() {
                        cell.1 = cell.1 * inverse % p;
                    }
                    pivots.insert(column, row);
                    break;
                }
            }
        }
    }
    Ok(pivots.len())
}

/// Rank as the maximum of the modular ranks over `primes`.
///
/// Each modular rank is at most the rational one, so the result is a lower bound that
/// is exact unless every prime divides some maximal minor.
pub fn rank(matrix: &OperatorMatrix, primes: &[u64]) -> Result<usize, WohError> {
    if matrix.is_zero() {
        return Ok(0);
    }
    let mut best = 0;
    for &p in primes {
        best = best.max(rank_mod_prime(matrix, p)?);
    }
    Ok(best)
}
