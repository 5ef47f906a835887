//! Error types for record sources

use rov_common::{InputError, InvariantViolation};
use std::path::PathBuf;
use thiserror::Error;

/// Source loading error
#[derive(Error, Debug)]
pub enum SourceError {
    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON for its format
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SLURM version other than 1
    #[error("unsupported SLURM version: {0}")]
    UnsupportedVersion(u32),

    /// Entry field could not be interpreted
    #[error("entry {index}: {source}")]
    Input {
        /// Position of the entry
        index: usize,
        /// What was wrong with it
        #[source]
        source: InputError,
    },

    /// Entry breaks a record invariant
    #[error("{kind} {index}: {source}")]
    Invariant {
        /// Entry kind, e.g. `prefix filter`
        kind: &'static str,
        /// Position of the entry within its list
        index: usize,
        /// Broken invariant
        #[source]
        source: InvariantViolation,
    },
}

/// Result type for record sources
pub type SourceResult<T> = Result<T, SourceError>;
