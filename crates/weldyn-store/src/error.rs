//! Error types for artifact persistence
//!
//! Every variant names the file it concerns. I/O failures keep their
//! original [`std::io::Error`] as the source.

use std::path::PathBuf;

/// Errors while reading, writing, or locking an artifact
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document text could not be parsed
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Tree could not be rendered in the document format
    #[error("cannot encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Document parsed, but its top level is not a mapping
    #[error("{path} must hold a mapping at the top level, found {found}")]
    NotAMapping { path: PathBuf, found: &'static str },

    /// Lock held elsewhere (non-blocking acquisition only)
    #[error("{path} is locked by another writer")]
    Locked { path: PathBuf },

    /// OS lock could not be taken or released
    #[error("cannot lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a [`DocumentCodec`](crate::DocumentCodec)
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// YAML syntax or rendering failure
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax or rendering failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stream holds more than one document
    #[error("expected a single document, found {0}")]
    MultipleDocuments(usize),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create lock error for path
    pub fn lock_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Lock {
            path: path.into(),
            source,
        }
    }
}
