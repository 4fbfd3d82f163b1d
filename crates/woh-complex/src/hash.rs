use sha2::{Digest, Sha256};

use crate::matrix::MatrixEntry;

/// Fingerprint of a basis: its codes in order, one per line.
pub fn basis_fingerprint(codes: &[String]) -> String {
    let mut hasher = Sha256::new();
    for code in codes {
        hasher.update(code.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// Fingerprint of a sparse matrix: its shape followed by its entries in order.
pub fn matrix_fingerprint(domain_dim: usize, target_dim: usize, entries: &[MatrixEntry]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((domain_dim as u64).to_le_bytes());
    hasher.update((target_dim as u64).to_le_bytes());
    for entry in entries {
        hasher.update((entry.domain as u64).to_le_bytes());
        hasher.update((entry.target as u64).to_le_bytes());
        hasher.update(entry.coefficient.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}
