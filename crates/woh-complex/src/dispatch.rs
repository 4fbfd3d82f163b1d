use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use woh_core::errors::{ErrorInfo, WohError};

use crate::complex::GraphComplex;
use crate::config::{load_config, RunConfig};
use crate::report::{CohomologyTable, DimensionTable, RankEntry, SquareZeroReport};
use crate::session::Session;
use crate::store::BasisStore;

/// Everything a run computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Dimensions and Euler characteristics.
    pub dimensions: DimensionTable,
    /// One square-zero report per differential.
    pub square_zero: Vec<SquareZeroReport>,
    /// Ranks of every operator matrix.
    pub ranks: Vec<RankEntry>,
    /// One cohomology table per differential.
    pub cohomology: Vec<CohomologyTable>,
}

impl RunReport {
    /// Whether every square-zero test passed.
    pub fn is_consistent(&self) -> bool {
        self.square_zero.iter().all(SquareZeroReport::is_success)
    }
}

/// Session for `config`, opening its store when one is configured.
pub fn open_session(config: &RunConfig) -> Result<Session, WohError> {
    match &config.store.dir {
        Some(dir) => Ok(Session::with_store(BasisStore::open(dir, config.store.format)?)),
        None => Ok(Session::new()),
    }
}

/// Builds bases and matrices, then runs the square-zero test, ranks and cohomology
/// for every configured differential.
pub fn run(config: &RunConfig) -> Result<RunReport, WohError> {
    config.validate()?;
    let session = open_session(config)?;
    let complex = GraphComplex::from_config(config);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.max(1))
        .build()
        .map_err(|err| WohError::Parameters(ErrorInfo::new("thread-pool", err.to_string())))?;

    pool.install(|| -> Result<RunReport, WohError> {
        complex.build_basis(&session, config.force_rebuild)?;
        complex.build_matrices(&session, config.force_rebuild)?;
        let square_zero = complex
            .differentials()
            .iter()
            .map(|&differential| complex.square_zero_test(&session, differential))
            .collect::<Result<Vec<_>, WohError>>()?;
        let ranks = complex.compute_ranks(&session)?;
        let cohomology = complex
            .differentials()
            .iter()
            .map(|&differential| complex.cohomology(&session, differential))
            .collect::<Result<Vec<_>, WohError>>()?;
        let dimensions = complex.dimension_table(&session)?;
        info!(
            "run finished: {} spaces, {} operators",
            complex.vector_spaces().len(),
            ranks.len()
        );
        Ok(RunReport {
            dimensions,
            square_zero,
            ranks,
            cohomology,
        })
    })
}

/// Loads a YAML configuration and runs it.
pub fn run_from_path(path: &Path) -> Result<RunReport, WohError> {
    let config = load_config(path)?;
    run(&config)
}
