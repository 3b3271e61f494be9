//! Error types for the scout-search crate.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type covering every failure mode of the index and query paths.
#[derive(Error, Debug)]
pub enum ScoutError {
    /// A required input field was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The document identifier is already present in the forward index.
    #[error("document {0} already exists")]
    DuplicateDocument(u64),

    /// Tokenization produced no indexable tokens.
    #[error("document yields no indexable tokens")]
    EmptyDocument,

    /// A side-metadata file (market values, profile lengths) is absent.
    ///
    /// Recoverable: the boosts that consume the file are skipped.
    #[error("side metadata file not found: {}", .0.display())]
    MissingSideFile(PathBuf),

    /// A barrel file is absent while the routing table points to it, or its
    /// JSON does not parse. Fatal for the affected operation.
    #[error("corrupt barrel '{name}': {reason}")]
    CorruptBarrel { name: String, reason: String },

    /// An argument outside the contract (e.g. `top_k` of zero).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal index inconsistency.
    #[error("index error: {0}")]
    Index(String),

    /// Any other file read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A core index file failed to serialize or deserialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The market-value CSV failed to parse.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScoutError {
    /// Create a missing-field error.
    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        ScoutError::MissingField(field.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        ScoutError::InvalidArgument(message.into())
    }

    /// Create an index-inconsistency error.
    pub fn index<S: Into<String>>(message: S) -> Self {
        ScoutError::Index(message.into())
    }

    /// Create a corrupt-barrel error.
    pub fn corrupt_barrel<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        ScoutError::CorruptBarrel {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-side-file error.
    pub fn missing_side_file<P: AsRef<Path>>(path: P) -> Self {
        ScoutError::MissingSideFile(path.as_ref().to_path_buf())
    }
}

/// Result type alias for scout-search operations.
pub type Result<T> = std::result::Result<T, ScoutError>;
