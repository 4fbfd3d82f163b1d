#![deny(missing_docs)]
#![doc = "Shared error and provenance types for the weight 11 hairy graph complex workspace."]

pub mod errors;
pub mod provenance;

pub use errors::{ErrorInfo, WohError};
pub use provenance::{ArtefactProvenance, SchemaVersion};
