use log::debug;
use woh_core::errors::WohError;
use woh_graph::perm::multiset_permutations;
use woh_graph::{hairy_graphs, Graph, Layout};

use crate::params::{ComponentParams, SpaceKey};
use crate::session::Session;
use crate::space::GraphVectorSpace;

/// Connected decorated graphs of a fixed component tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSpace {
    params: ComponentParams,
}

impl ComponentSpace {
    /// Space of the given tuple.
    pub fn new(params: ComponentParams) -> Self {
        Self { params }
    }

    /// Underlying tuple.
    pub fn params(&self) -> &ComponentParams {
        &self.params
    }
}

impl GraphVectorSpace for ComponentSpace {
    fn key(&self) -> SpaceKey {
        SpaceKey::Component(self.params)
    }

    fn is_valid(&self) -> bool {
        self.params.is_valid()
    }

    fn layout_for(&self, _graph: &Graph) -> Result<Layout, WohError> {
        Ok(self.params.layout())
    }

    /// Every hairy graph under every assignment of its hairs to numbered slots, the
    /// omega block and the epsilon block.
    fn generating_graphs(&self, _session: &Session) -> Result<Vec<Graph>, WohError> {
        let p = &self.params;
        let undecorated = hairy_graphs(p.n_vertices, p.n_loops, p.n_hairs())?;
        let assignments = multiset_permutations(p.n_vertices, p.n_numbered, p.n_omega, p.n_epsilon);
        debug!(
            "component {}: hairy graphs={} hair assignments={}",
            p.file_stem(),
            undecorated.len(),
            assignments.len()
        );
        let mut out = Vec::with_capacity(undecorated.len() * assignments.len());
        for graph in &undecorated {
            for assignment in &assignments {
                out.push(graph.relabel(assignment)?);
            }
        }
        Ok(out)
    }
}
