use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use woh_core::errors::{ErrorInfo, WohError};

use crate::linalg::{is_prime, DEFAULT_PRIMES, MAX_MODULUS};
use crate::operators::Differential;
use crate::serde::from_yaml_slice;
use crate::store::StoreFormat;

fn parameters_error(code: &str, message: &str) -> WohError {
    WohError::Parameters(ErrorInfo::new(code, message))
}

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRange {
    /// Lower bound.
    pub min: usize,
    /// Upper bound, inclusive.
    pub max: usize,
}

impl ParamRange {
    /// Range `min..=max`.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Range holding one value.
    pub const fn single(value: usize) -> Self {
        Self::new(value, value)
    }

    /// Iterator over the values.
    pub fn values(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }

    /// Whether `min > max`.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Whether `value` lies in the range.
    pub fn contains(&self, value: usize) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Where bases and matrices are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store directory; in-memory only when absent.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Record encoding.
    #[serde(default)]
    pub format: StoreFormat,
}

/// YAML-configurable parameters of a complex run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Genus range.
    #[serde(default = "default_genus")]
    pub genus: ParamRange,
    /// Numbered-leg range.
    #[serde(default = "default_n_numbered")]
    pub n_numbered: ParamRange,
    /// Omega range.
    #[serde(default = "default_n_omega")]
    pub n_omega: ParamRange,
    /// Degree range.
    #[serde(default = "default_degree")]
    pub degree: ParamRange,
    /// Differentials to build.
    #[serde(default = "default_differentials")]
    pub differentials: Vec<Differential>,
    /// Persistence settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Rebuild requested bases and matrices even when cached.
    #[serde(default)]
    pub force_rebuild: bool,
    /// Worker threads.
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Moduli for exact rank.
    #[serde(default = "default_rank_primes")]
    pub rank_primes: Vec<u64>,
}

fn default_genus() -> ParamRange {
    ParamRange::single(5)
}

fn default_n_numbered() -> ParamRange {
    ParamRange::single(6)
}

fn default_n_omega() -> ParamRange {
    ParamRange::new(11, 13)
}

fn default_degree() -> ParamRange {
    ParamRange::new(15, 22)
}

fn default_differentials() -> Vec<Differential> {
    Differential::ALL.to_vec()
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_rank_primes() -> Vec<u64> {
    DEFAULT_PRIMES.to_vec()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            genus: default_genus(),
            n_numbered: default_n_numbered(),
            n_omega: default_n_omega(),
            degree: default_degree(),
            differentials: default_differentials(),
            store: StoreConfig::default(),
            force_rebuild: false,
            threads: default_threads(),
            rank_primes: default_rank_primes(),
        }
    }
}

impl RunConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, WohError> {
        from_yaml_slice(text.as_bytes())
    }

    /// Rejects configurations that cannot drive a run.
    pub fn validate(&self) -> Result<(), WohError> {
        let ranges = [
            ("genus", &self.genus),
            ("n_numbered", &self.n_numbered),
            ("n_omega", &self.n_omega),
            ("degree", &self.degree),
        ];
        for (name, range) in ranges {
            if range.is_empty() {
                return Err(WohError::Parameters(
                    ErrorInfo::new("empty-range", "parameter range has min above max")
                        .with_context("field", name)
                        .with_context("range", format!("{}..={}", range.min, range.max)),
                ));
            }
        }
        if self.threads == 0 {
            return Err(parameters_error("zero-threads", "thread count must be positive"));
        }
        if self.rank_primes.is_empty() {
            return Err(parameters_error("no-primes", "at least one rank modulus is required"));
        }
        if let Some(&bad) = self
            .rank_primes
            .iter()
            .find(|&&p| p >= MAX_MODULUS || !is_prime(p))
        {
            return Err(WohError::Parameters(
                ErrorInfo::new("bad-modulus", "rank moduli must be primes below 2^32")
                    .with_context("modulus", bad.to_string())
                    .with_hint("use the default moduli 2147483647 and 1000000007"),
            ));
        }
        Ok(())
    }
}

/// Loads and validates a run configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<RunConfig, WohError> {
    let bytes = fs::read(path).map_err(|err| {
        WohError::Parameters(
            ErrorInfo::new("config-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    let config: RunConfig = from_yaml_slice(&bytes)?;
    config.validate()?;
    Ok(config)
}
