//! Schema descriptors attached to persisted bases and operator matrices.

use serde::{Deserialize, Serialize};

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Returns whether payloads written under `other` can be read under `self`.
    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major && other.minor <= self.minor
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance written next to every persisted artefact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArtefactProvenance {
    /// Schema of the payload.
    pub schema_version: SchemaVersion,
    /// Hex encoded SHA-256 fingerprint of the payload body.
    pub fingerprint: String,
    /// Name and version of the crate that produced the payload.
    pub producer: String,
}

impl ArtefactProvenance {
    /// Creates provenance for a payload with the given fingerprint.
    pub fn new(fingerprint: impl Into<String>, producer: impl Into<String>) -> Self {
        Self {
            schema_version: SchemaVersion::default(),
            fingerprint: fingerprint.into(),
            producer: producer.into(),
        }
    }
}
