//! Error types shared by the library and the binary.

use std::path::PathBuf;

use thiserror::Error;

use crate::algorithm::Algorithm;

/// Failure to read, decode, write or validate a single artifact file.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("{} not found", path.display())]
    Missing { path: PathBuf },

    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rmp_serde::decode::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: rmp_serde::encode::Error,
    },

    #[error("invalid artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ArtifactError {
    /// Path of the artifact the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ArtifactError::Missing { path }
            | ArtifactError::Io { path, .. }
            | ArtifactError::Decode { path, .. }
            | ArtifactError::Encode { path, .. }
            | ArtifactError::Invalid { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum SizeError {
    /// Shared artifacts (scaler, encoder, stats) are unusable. Nothing works
    /// without them.
    #[error("data files unavailable: {0}")]
    Startup(#[source] ArtifactError),

    #[error("{algorithm} model unavailable: {source}")]
    ModelUnavailable {
        algorithm: Algorithm,
        #[source]
        source: ArtifactError,
    },

    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{algorithm} model expects {expected} features, got {actual}")]
    DimensionMismatch {
        algorithm: Algorithm,
        expected: String,
        actual: usize,
    },

    #[error("{algorithm} model produced no finite class score")]
    NoDecision { algorithm: Algorithm },

    #[error("predicted class index {0} is not known to the label encoder")]
    UnknownClass(usize),

    #[error("size label {0:?} is not known to the label encoder")]
    UnknownLabel(String),

    #[error("{field} must be a number, got {token:?}")]
    InvalidNumber { field: &'static str, token: String },

    #[error("unrecognised command {0:?}")]
    UnknownCommand(String),

    #[error("unknown algorithm {0:?}")]
    UnknownAlgorithm(String),

    #[error("unknown clothing item {0:?}")]
    UnknownItem(String),

    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<SizeError>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SizeError {
    /// Whether the error makes the whole session unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SizeError::Startup(_))
    }
}

pub type Result<T> = std::result::Result<T, SizeError>;
