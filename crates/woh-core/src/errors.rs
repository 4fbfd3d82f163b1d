//! Structured error types shared across the workspace crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`WohError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (parameter tuples, vertex indices, sizes).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for basis generation, operators and persistence.
///
/// Invalid parameter tuples are not errors: they produce empty bases. Vanishing
/// terms of an operator image are algebraic zeros and are dropped silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum WohError {
    /// Malformed configuration or an explicitly required parameter tuple is unusable.
    #[error("parameter error: {0}")]
    Parameters(ErrorInfo),
    /// Orientation bookkeeping violated an invariant; results can no longer be trusted.
    #[error("sign error: {0}")]
    Sign(ErrorInfo),
    /// Operator requested between spaces that are not adjacent.
    #[error("operator error: {0}")]
    Operator(ErrorInfo),
    /// Malformed graph, partition or graph encoding.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Matrix shape mismatches and coefficient overflow.
    #[error("algebra error: {0}")]
    Algebra(ErrorInfo),
    /// Filesystem failures of the basis and matrix store.
    #[error("store error: {0}")]
    Store(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl WohError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            WohError::Parameters(info)
            | WohError::Sign(info)
            | WohError::Operator(info)
            | WohError::Graph(info)
            | WohError::Algebra(info)
            | WohError::Store(info)
            | WohError::Serde(info) => info,
        }
    }

    /// Returns whether the error signals corrupted orientation bookkeeping.
    pub fn is_fatal_sign(&self) -> bool {
        matches!(self, WohError::Sign(_))
    }
}
