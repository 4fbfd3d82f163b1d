use log::debug;
use woh_core::errors::{ErrorInfo, WohError};
use woh_graph::{Graph, Layout};

use crate::params::{AggregatedParams, FinalParams, SpaceKey};
use crate::session::Session;
use crate::space::GraphVectorSpace;

/// Graphs of a fixed genus, leg counts and cohomological degree.
///
/// The epsilon count is not part of the tuple; each graph's epsilon block is whatever
/// remains after the internal, numbered and omega blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalSpace {
    params: FinalParams,
}

impl FinalSpace {
    /// Space of the given tuple.
    pub fn new(params: FinalParams) -> Self {
        Self { params }
    }

    /// Underlying tuple.
    pub fn params(&self) -> &FinalParams {
        &self.params
    }

    /// Valid aggregated tuples landing in this degree.
    pub fn aggregated_parts(&self) -> Result<Vec<AggregatedParams>, WohError> {
        let p = &self.params;
        if !p.is_valid() {
            return Ok(Vec::new());
        }
        let n_vertices = usize::try_from(p.n_vertices()).unwrap_or(0);
        let max_epsilon = p.max_epsilon();
        let max_components = p.n_omega + max_epsilon;
        let mut parts = Vec::new();
        for n_epsilon in 0..=max_epsilon {
            for n_components in 0..=max_components {
                for n_double_legs in 0..=n_components {
                    let part = AggregatedParams::new(
                        n_components,
                        n_vertices,
                        p.genus,
                        p.n_numbered,
                        p.n_omega,
                        n_epsilon,
                        n_double_legs,
                    );
                    if part.cohom_degree() != p.degree as i64 {
                        return Err(WohError::Parameters(
                            ErrorInfo::new("degree-mismatch", "aggregated part lands in another degree")
                                .with_context("final", p.file_stem())
                                .with_context("aggregated", part.file_stem()),
                        ));
                    }
                    if part.is_valid() {
                        parts.push(part);
                    }
                }
            }
        }
        Ok(parts)
    }
}

impl GraphVectorSpace for FinalSpace {
    fn key(&self) -> SpaceKey {
        SpaceKey::Final(self.params)
    }

    fn is_valid(&self) -> bool {
        self.params.is_valid()
    }

    fn layout_for(&self, graph: &Graph) -> Result<Layout, WohError> {
        self.params.layout_for_order(graph.order())
    }

    fn generating_graphs(&self, session: &Session) -> Result<Vec<Graph>, WohError> {
        let mut out = Vec::new();
        for part in self.aggregated_parts()? {
            let basis = session.basis(&SpaceKey::Aggregated(part))?;
            debug!(
                "final {}: part {} contributes {}",
                self.params.file_stem(),
                part.file_stem(),
                basis.dimension()
            );
            out.extend(basis.graphs()?);
        }
        Ok(out)
    }
}
