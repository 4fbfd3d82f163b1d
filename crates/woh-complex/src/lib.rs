#![deny(missing_docs)]
#![doc = "Graph vector spaces of the weight 11 decorated hairy graph complex: component, aggregated and final bases, the contraction and epsilon-to-omega differentials, exact ranks, cohomology reports and persistence."]

/// Multi-component spaces built by recursive splitting.
pub mod aggregated;
/// Orchestration over ranges of final spaces.
pub mod complex;
/// Connected single-piece spaces.
pub mod component;
/// YAML run configuration.
pub mod config;
/// Run driver.
pub mod dispatch;
/// Fixed-degree spaces.
pub mod final_space;
/// SHA-256 fingerprints of persisted bases and matrices.
pub mod hash;
pub mod linalg;
/// Sparse operator matrices.
pub mod matrix;
pub mod operators;
pub mod params;
/// Dimension, rank, square-zero and cohomology reports.
pub mod report;
/// Record, report and configuration encoders.
pub mod serde;
/// Memo table of bases and matrices.
pub mod session;
/// The vector space abstraction and basis construction.
pub mod space;
/// On-disk basis and matrix store.
pub mod store;

pub use aggregated::{AggregatedSpace, Configuration};
pub use complex::GraphComplex;
pub use component::ComponentSpace;
pub use config::{load_config, ParamRange, RunConfig, StoreConfig};
pub use dispatch::{open_session, run, run_from_path, RunReport};
pub use final_space::FinalSpace;
pub use linalg::{rank, rank_mod_prime, DEFAULT_PRIMES};
pub use matrix::{build_matrix, MatrixEntry, OperatorMatrix};
pub use operators::{Differential, GraphOperator, OperatorKey};
pub use params::{excess, AggregatedParams, ComponentParams, FinalParams, SpaceKey};
pub use report::{
    euler_characteristic, euler_characteristic_over_omega, CohomologyEntry, CohomologyTable,
    DimensionRow, DimensionTable, RankEntry, SquareZeroReport,
};
pub use session::Session;
pub use space::{build_basis, Basis, GraphVectorSpace};
pub use store::{BasisStore, StoreFormat};
