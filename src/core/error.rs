use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the texture pipeline.
///
/// User-initiated actions return these to the caller; the automatic watch
/// path logs them and carries on.
#[derive(Debug, Error)]
pub enum SdfError {
    #[error("could not read image {path}: {reason}")]
    DecodeFailure { path: PathBuf, reason: String },

    #[error("{0}")]
    InvalidState(&'static str),

    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("could not write {path}: {reason}")]
    EncodeFailure { path: PathBuf, reason: String },

    #[error("file watcher error: {0}")]
    Watch(String),
}

impl SdfError {
    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SdfError::InvalidPath { path: path.into(), reason: reason.into() }
    }
}
