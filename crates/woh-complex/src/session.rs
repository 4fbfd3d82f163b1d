use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;
use woh_core::errors::WohError;

use crate::matrix::{build_matrix, OperatorMatrix};
use crate::operators::{GraphOperator, OperatorKey};
use crate::params::SpaceKey;
use crate::space::{build_for_key, Basis};
use crate::store::BasisStore;

/// Memo table of bases and matrices for one build session, optionally backed by a
/// store.
///
/// Lookups return the same value for the same key. Values are computed outside the
/// lock, so recursive builds never deadlock; if two threads race on one key, both
/// compute the same value and the first insert wins.
#[derive(Debug, Default)]
pub struct Session {
    bases: Mutex<HashMap<SpaceKey, Arc<Basis>>>,
    matrices: Mutex<HashMap<OperatorKey, Arc<OperatorMatrix>>>,
    store: Option<BasisStore>,
}

fn cached<K: Eq + Hash, V>(table: &Mutex<HashMap<K, Arc<V>>>, key: &K) -> Option<Arc<V>> {
    table
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(key)
        .cloned()
}

fn remember<K: Eq + Hash, V>(table: &Mutex<HashMap<K, Arc<V>>>, key: K, value: V) -> Arc<V> {
    table
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert_with(|| Arc::new(value))
        .clone()
}

fn replace<K: Eq + Hash, V>(table: &Mutex<HashMap<K, Arc<V>>>, key: K, value: V) -> Arc<V> {
    let value = Arc::new(value);
    table
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, value.clone());
    value
}

impl Session {
    /// In-memory session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session persisting every built artefact to `store`.
    pub fn with_store(store: BasisStore) -> Self {
        Self {
            store: Some(store),
            ..Self::default()
        }
    }

    /// Backing store, if any.
    pub fn store(&self) -> Option<&BasisStore> {
        self.store.as_ref()
    }

    /// Basis of `key` from the memo, then the store, otherwise built and persisted.
    pub fn basis(&self, key: &SpaceKey) -> Result<Arc<Basis>, WohError> {
        if let Some(basis) = cached(&self.bases, key) {
            return Ok(basis);
        }
        if let Some(store) = &self.store {
            if let Some(basis) = store.load_basis(key)? {
                debug!("store hit for basis {key}");
                return Ok(remember(&self.bases, *key, basis));
            }
        }
        let basis = build_for_key(key, self)?;
        if let Some(store) = &self.store {
            store.save_basis(&basis)?;
        }
        Ok(remember(&self.bases, *key, basis))
    }

    /// Builds the basis of `key` ignoring the memo and the store, then replaces both.
    ///
    /// Sub-spaces are still taken from the memo or the store.
    pub fn rebuild(&self, key: &SpaceKey) -> Result<Arc<Basis>, WohError> {
        let basis = build_for_key(key, self)?;
        if let Some(store) = &self.store {
            store.save_basis(&basis)?;
        }
        Ok(replace(&self.bases, *key, basis))
    }

    /// Matrix of `operator` from the memo, then the store, otherwise built and persisted.
    pub fn matrix(&self, operator: &GraphOperator) -> Result<Arc<OperatorMatrix>, WohError> {
        let key = operator.key();
        if let Some(matrix) = cached(&self.matrices, &key) {
            return Ok(matrix);
        }
        if let Some(store) = &self.store {
            if let Some(matrix) = store.load_matrix(&key)? {
                debug!("store hit for matrix {key}");
                return Ok(remember(&self.matrices, key, matrix));
            }
        }
        let matrix = self.compute_matrix(operator)?;
        Ok(remember(&self.matrices, key, matrix))
    }

    /// Builds the matrix of `operator` ignoring the memo and the store.
    pub fn rebuild_matrix(&self, operator: &GraphOperator) -> Result<Arc<OperatorMatrix>, WohError> {
        let matrix = self.compute_matrix(operator)?;
        Ok(replace(&self.matrices, operator.key(), matrix))
    }

    fn compute_matrix(&self, operator: &GraphOperator) -> Result<OperatorMatrix, WohError> {
        let domain = self.basis(&SpaceKey::Final(*operator.domain()))?;
        let target = self.basis(&SpaceKey::Final(*operator.target()))?;
        let matrix = build_matrix(operator, &domain, &target)?;
        if let Some(store) = &self.store {
            store.save_matrix(&operator.key(), &matrix)?;
        }
        Ok(matrix)
    }
}
