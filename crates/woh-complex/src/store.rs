//! Directory-backed persistence of bases and operator matrices.
//!
//! Every artefact is one file named after its key. Files are written to a temporary
//! sibling and renamed into place, so readers see either nothing or a complete
//! record. A record that fails its structural checks is reported as absent and gets
//! rebuilt by the caller.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use woh_core::errors::{ErrorInfo, WohError};
use woh_core::{ArtefactProvenance, SchemaVersion};
use woh_graph::graph6;

use crate::hash::{basis_fingerprint, matrix_fingerprint};
use crate::matrix::{MatrixEntry, OperatorMatrix};
use crate::operators::OperatorKey;
use crate::params::SpaceKey;
use crate::serde::{from_bincode_slice, from_json_slice, to_bincode_bytes, to_canonical_json_bytes};
use crate::space::Basis;

const PRODUCER: &str = concat!("woh-complex ", env!("CARGO_PKG_VERSION"));

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn store_error(code: &str, path: &Path, err: impl ToString) -> WohError {
    WohError::Store(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// On-disk encoding of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFormat {
    /// Canonical JSON, `.json`.
    #[default]
    Json,
    /// `bincode`, `.bin`.
    Binary,
}

impl StoreFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            StoreFormat::Json => "json",
            StoreFormat::Binary => "bin",
        }
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, WohError> {
        match self {
            StoreFormat::Json => to_canonical_json_bytes(value),
            StoreFormat::Binary => to_bincode_bytes(value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, WohError> {
        match self {
            StoreFormat::Json => from_json_slice(bytes),
            StoreFormat::Binary => from_bincode_slice(bytes),
        }
    }
}

// Keys are stored as their file stems so that both encodings can read them back.
#[derive(Debug, Serialize, Deserialize)]
struct BasisRecord {
    key: String,
    provenance: ArtefactProvenance,
    dimension: usize,
    codes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MatrixRecord {
    key: String,
    provenance: ArtefactProvenance,
    domain_dim: usize,
    target_dim: usize,
    entries: Vec<MatrixEntry>,
}

/// Store rooted at one directory.
#[derive(Debug, Clone)]
pub struct BasisStore {
    root: PathBuf,
    format: StoreFormat,
}

impl BasisStore {
    /// Opens the store, creating its directory when missing.
    pub fn open(root: impl Into<PathBuf>, format: StoreFormat) -> Result<Self, WohError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| store_error("store-mkdir", &root, err))?;
        Ok(Self { root, format })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record encoding.
    pub fn format(&self) -> StoreFormat {
        self.format
    }

    /// File holding the basis of `key`.
    pub fn basis_path(&self, key: &SpaceKey) -> PathBuf {
        self.root
            .join(format!("{}.{}", key.file_stem(), self.format.extension()))
    }

    /// File holding the matrix of `key`.
    pub fn matrix_path(&self, key: &OperatorKey) -> PathBuf {
        self.root
            .join(format!("{}.{}", key.file_stem(), self.format.extension()))
    }

    /// Persists a basis.
    pub fn save_basis(&self, basis: &Basis) -> Result<(), WohError> {
        let record = BasisRecord {
            key: basis.key().file_stem(),
            provenance: ArtefactProvenance::new(basis_fingerprint(basis.codes()), PRODUCER),
            dimension: basis.dimension(),
            codes: basis.codes().to_vec(),
        };
        let bytes = self.format.encode(&record)?;
        write_atomic(&self.basis_path(basis.key()), &bytes)
    }

    /// Loads the basis of `key`; `None` when absent or rejected.
    pub fn load_basis(&self, key: &SpaceKey) -> Result<Option<Basis>, WohError> {
        let path = self.basis_path(key);
        let Some(bytes) = read_if_present(&path)? else {
            return Ok(None);
        };
        let record: BasisRecord = match self.format.decode(&bytes) {
            Ok(record) => record,
            Err(err) => {
                warn!("discarding unreadable basis {}: {err}", path.display());
                return Ok(None);
            }
        };
        if let Err(reason) = check_basis(&record, key) {
            warn!("discarding basis {}: {reason}", path.display());
            return Ok(None);
        }
        debug!("loaded basis {key} from {}", path.display());
        Ok(Some(Basis::new(*key, record.codes)))
    }

    /// Persists an operator matrix.
    pub fn save_matrix(&self, key: &OperatorKey, matrix: &OperatorMatrix) -> Result<(), WohError> {
        let record = MatrixRecord {
            key: key.file_stem(),
            provenance: ArtefactProvenance::new(
                matrix_fingerprint(matrix.domain_dim(), matrix.target_dim(), matrix.entries()),
                PRODUCER,
            ),
            domain_dim: matrix.domain_dim(),
            target_dim: matrix.target_dim(),
            entries: matrix.entries().to_vec(),
        };
        let bytes = self.format.encode(&record)?;
        write_atomic(&self.matrix_path(key), &bytes)
    }

    /// Loads the matrix of `key`; `None` when absent or rejected.
    pub fn load_matrix(&self, key: &OperatorKey) -> Result<Option<OperatorMatrix>, WohError> {
        let path = self.matrix_path(key);
        let Some(bytes) = read_if_present(&path)? else {
            return Ok(None);
        };
        let record: MatrixRecord = match self.format.decode(&bytes) {
            Ok(record) => record,
            Err(err) => {
                warn!("discarding unreadable matrix {}: {err}", path.display());
                return Ok(None);
            }
        };
        if let Err(reason) = check_matrix(&record, key) {
            warn!("discarding matrix {}: {reason}", path.display());
            return Ok(None);
        }
        match OperatorMatrix::new(record.domain_dim, record.target_dim, record.entries) {
            Ok(matrix) => {
                debug!("loaded matrix {key} from {}", path.display());
                Ok(Some(matrix))
            }
            Err(err) => {
                warn!("discarding matrix {}: {err}", path.display());
                Ok(None)
            }
        }
    }
}

fn check_provenance(provenance: &ArtefactProvenance, fingerprint: &str) -> Result<(), String> {
    if !SchemaVersion::default().is_compatible_with(&provenance.schema_version) {
        return Err(format!(
            "incompatible schema {}.{}.{}",
            provenance.schema_version.major, provenance.schema_version.minor, provenance.schema_version.patch
        ));
    }
    if provenance.fingerprint != fingerprint {
        return Err("fingerprint mismatch".to_string());
    }
    Ok(())
}

fn check_basis(record: &BasisRecord, key: &SpaceKey) -> Result<(), String> {
    if record.key != key.file_stem() {
        return Err(format!("record belongs to {}", record.key));
    }
    if record.dimension != record.codes.len() {
        return Err(format!(
            "dimension {} but {} codes",
            record.dimension,
            record.codes.len()
        ));
    }
    if record.codes.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err("codes are not strictly sorted".to_string());
    }
    if let Some(bad) = record.codes.iter().find(|code| graph6::decode(code).is_err()) {
        return Err(format!("malformed code {bad:?}"));
    }
    check_provenance(&record.provenance, &basis_fingerprint(&record.codes))
}

fn check_matrix(record: &MatrixRecord, key: &OperatorKey) -> Result<(), String> {
    if record.key != key.file_stem() {
        return Err(format!("record belongs to {}", record.key));
    }
    let fingerprint = matrix_fingerprint(record.domain_dim, record.target_dim, &record.entries);
    check_provenance(&record.provenance, &fingerprint)
}

fn read_if_present(path: &Path) -> Result<Option<Vec<u8>>, WohError> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read(path)
        .map(Some)
        .map_err(|err| store_error("store-read", path, err))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), WohError> {
    let mut tmp = path.as_os_str().to_owned();
    // Racing writers of the same key each get their own temporary file.
    tmp.push(format!(
        ".{}.{}.tmp",
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes).map_err(|err| store_error("store-write", &tmp, err))?;
    fs::rename(&tmp, path).map_err(|err| store_error("store-rename", path, err))
}
