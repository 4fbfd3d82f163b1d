//! Permutation utilities: bijection checks, inverses, signs and the restricted
//! relabeling sets used to decorate hairs.
//!
//! A permutation `p` of `0..n` is read as "vertex `i` goes to `p[i]`".

use itertools::Itertools;
use woh_core::errors::{ErrorInfo, WohError};

/// Returns whether `p` is a bijection of `0..p.len()`.
pub fn is_permutation(p: &[usize]) -> bool {
    let mut seen = vec![false; p.len()];
    for &x in p {
        if x >= p.len() || seen[x] {
            return false;
        }
        seen[x] = true;
    }
    true
}

/// Inverse permutation.
pub fn inverse(p: &[usize]) -> Result<Vec<usize>, WohError> {
    if !is_permutation(p) {
        return Err(WohError::Sign(
            ErrorInfo::new("not-a-permutation", "cannot invert a non-bijective map")
                .with_context("map", format!("{p:?}")),
        ));
    }
    let mut inv = vec![0; p.len()];
    for (i, &x) in p.iter().enumerate() {
        inv[x] = i;
    }
    Ok(inv)
}

/// Composition `first` then `second`, i.e. `i -> second[first[i]]`.
pub fn compose(first: &[usize], second: &[usize]) -> Vec<usize> {
    first.iter().map(|&x| second[x]).collect()
}

/// Transposition of `a` and `b` on `0..n`.
pub fn transposition(n: usize, a: usize, b: usize) -> Vec<usize> {
    let mut p: Vec<usize> = (0..n).collect();
    p.swap(a, b);
    p
}

/// Sign of the permutation sorting a sequence of distinct values.
///
/// Only the relative order matters, so the values need not form `0..len`. This is
/// the parity of the number of inversions.
pub fn sequence_sign(values: &[usize]) -> i32 {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by_key(|&i| values[i]);
    // `order` is a genuine permutation, so cycle parity gives the sign in linear time.
    let mut seen = vec![false; order.len()];
    let mut sign = 1;
    for start in 0..order.len() {
        if seen[start] {
            continue;
        }
        let mut length = 0;
        let mut x = start;
        while !seen[x] {
            seen[x] = true;
            x = order[x];
            length += 1;
        }
        if length % 2 == 0 {
            sign = -sign;
        }
    }
    sign
}

/// Sign of a permutation of `0..n`.
pub fn permutation_sign(p: &[usize]) -> i32 {
    sequence_sign(p)
}

/// Number of relabelings produced by [`multiset_permutations`].
pub fn multiset_permutation_count(n_numbered: usize, n_omega: usize, n_epsilon: usize) -> u128 {
    let total = n_numbered + n_omega + n_epsilon;
    let factorial = |k: usize| (1..=k as u128).product::<u128>();
    factorial(total) / (factorial(n_omega) * factorial(n_epsilon))
}

/// Relabelings assigning the hair vertices of a graph to decorations.
///
/// The first `n_internal` vertices are fixed. Hairs `n_internal..` are distributed
/// over `n_numbered` ordered slots, followed by an unordered omega block and an
/// unordered epsilon block, so exactly `(n+ω+ε)!/(ω!·ε!)` relabelings are produced.
pub fn multiset_permutations(
    n_internal: usize,
    n_numbered: usize,
    n_omega: usize,
    n_epsilon: usize,
) -> Vec<Vec<usize>> {
    let hairs = n_numbered + n_omega + n_epsilon;
    let mut out = Vec::new();
    for omega_slots in (0..hairs).combinations(n_omega) {
        let after_omega: Vec<usize> = (0..hairs).filter(|x| !omega_slots.contains(x)).collect();
        for epsilon_slots in after_omega.iter().copied().combinations(n_epsilon) {
            let numbered_pool: Vec<usize> = after_omega
                .iter()
                .copied()
                .filter(|x| !epsilon_slots.contains(x))
                .collect();
            for numbered in numbered_pool.iter().copied().permutations(n_numbered) {
                // `assignment[k]` is the hair that lands in decoration slot `k`.
                let assignment: Vec<usize> = numbered
                    .iter()
                    .chain(omega_slots.iter())
                    .chain(epsilon_slots.iter())
                    .copied()
                    .collect();
                let mut relabeling: Vec<usize> = (0..n_internal).collect();
                relabeling.resize(n_internal + hairs, 0);
                for (slot, &hair) in assignment.iter().enumerate() {
                    relabeling[n_internal + hair] = n_internal + slot;
                }
                out.push(relabeling);
            }
        }
    }
    out
}

/// Interleavings of two blocks of numbered legs.
///
/// Starting from `left ++ right`, every choice of `k` entries of `left` and `k` of
/// `right` (for `k` up to the shorter length) is swapped pairwise in order. Each
/// subset of slots taken by the `right` block arises exactly once, giving
/// `C(|left|+|right|, |left|)` arrangements.
pub fn cross_permutations(left: &[usize], right: &[usize]) -> Vec<Vec<usize>> {
    let joined: Vec<usize> = left.iter().chain(right.iter()).copied().collect();
    let mut out = Vec::new();
    for k in 0..=left.len().min(right.len()) {
        for from_left in (0..left.len()).combinations(k) {
            for from_right in (0..right.len()).combinations(k) {
                let mut arrangement = joined.clone();
                for (&a, &b) in from_left.iter().zip(from_right.iter()) {
                    arrangement.swap(a, left.len() + b);
                }
                out.push(arrangement);
            }
        }
    }
    out
}
