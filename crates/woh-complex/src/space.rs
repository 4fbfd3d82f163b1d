use std::collections::BTreeMap;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use woh_core::errors::WohError;
use woh_graph::{graph6, DecoratedGraph, Graph, Layout};

use crate::aggregated::AggregatedSpace;
use crate::component::ComponentSpace;
use crate::final_space::FinalSpace;
use crate::params::SpaceKey;
use crate::session::Session;

/// A vector space spanned by decorated graphs, one basis element per isomorphism
/// class without odd automorphisms.
pub trait GraphVectorSpace: Sync {
    /// Memo and store key.
    fn key(&self) -> SpaceKey;

    /// Invalid spaces are empty and never generate graphs.
    fn is_valid(&self) -> bool;

    /// Vertex blocks of `graph` when read as an element of this space.
    fn layout_for(&self, graph: &Graph) -> Result<Layout, WohError>;

    /// Candidate graphs covering every isomorphism class at least once.
    ///
    /// Sub-spaces are fetched through `session`, so recursive constructions share
    /// their bases.
    fn generating_graphs(&self, session: &Session) -> Result<Vec<Graph>, WohError>;
}

/// Sorted canonical graph6 codes spanning a graph vector space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basis {
    key: SpaceKey,
    codes: Vec<String>,
}

impl Basis {
    /// The zero-dimensional basis.
    pub fn empty(key: SpaceKey) -> Self {
        Self {
            key,
            codes: Vec::new(),
        }
    }

    /// Basis from canonical codes, sorted and deduplicated.
    pub fn new(key: SpaceKey, codes: impl IntoIterator<Item = String>) -> Self {
        let mut codes: Vec<String> = codes.into_iter().collect();
        codes.sort();
        codes.dedup();
        Self { key, codes }
    }

    /// Key of the space this basis spans.
    pub fn key(&self) -> &SpaceKey {
        &self.key
    }

    /// Number of basis elements.
    pub fn dimension(&self) -> usize {
        self.codes.len()
    }

    /// Whether the space is zero.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Canonical codes in basis order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Basis index of a canonical code.
    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.codes
            .binary_search_by(|probe| probe.as_str().cmp(code))
            .ok()
    }

    /// Basis graphs, edges labeled in sorted order.
    pub fn graphs(&self) -> Result<Vec<Graph>, WohError> {
        self.codes.iter().map(|code| graph6::decode(code)).collect()
    }
}

/// Canonicalizes every generating graph of `space` and keeps the classes without an
/// odd automorphism.
pub fn build_basis<S>(space: &S, session: &Session) -> Result<Basis, WohError>
where
    S: GraphVectorSpace + ?Sized,
{
    let key = space.key();
    if !space.is_valid() {
        debug!("space {key} is invalid, basis is empty");
        return Ok(Basis::empty(key));
    }
    let candidates = space.generating_graphs(session)?;
    let candidate_count = candidates.len();
    let images = candidates
        .into_par_iter()
        .map(|graph| {
            let layout = space.layout_for(&graph)?;
            DecoratedGraph::new(graph, layout)?.canonicalize()
        })
        .collect::<Result<Vec<_>, WohError>>()?;

    let mut classes: BTreeMap<String, bool> = BTreeMap::new();
    for image in images {
        classes
            .entry(image.code)
            .or_insert(image.odd_automorphism);
    }
    let class_count = classes.len();
    let basis = Basis::new(
        key,
        classes
            .into_iter()
            .filter(|(_, odd)| !odd)
            .map(|(code, _)| code),
    );
    info!(
        "built basis {key}: candidates={} classes={class_count} dimension={}",
        candidate_count,
        basis.dimension()
    );
    Ok(basis)
}

/// Builds the basis named by `key` with the space type it denotes.
pub(crate) fn build_for_key(key: &SpaceKey, session: &Session) -> Result<Basis, WohError> {
    match key {
        SpaceKey::Component(params) => build_basis(&ComponentSpace::new(*params), session),
        SpaceKey::Aggregated(params) => build_basis(&AggregatedSpace::new(*params), session),
        SpaceKey::Final(params) => build_basis(&FinalSpace::new(*params), session),
    }
}
