//! Error handling utilities shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = NbcError> = std::result::Result<T, E>;

/// Domain-specific error describing failures during configuration, snapshot import, or IO.
#[derive(Debug, Error)]
pub enum NbcError {
    /// Classifier configuration or corpus input failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A snapshot is missing one of the recognized state fields.
    #[error("snapshot is missing an expected property: '{field}'")]
    MissingField {
        /// Name of the absent field as it appears in the serialized snapshot.
        field: &'static str,
    },
    /// Filesystem IO error with optional context path.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// Underlying IO error returned by the standard library.
        source: std::io::Error,
        /// Target path associated with the IO failure if available.
        path: Option<PathBuf>,
    },
    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Catch-all variant for invariants that should not occur.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for NbcError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl NbcError {
    /// Helper constructor that attaches an optional path when wrapping IO errors.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { source, path }
    }
}
