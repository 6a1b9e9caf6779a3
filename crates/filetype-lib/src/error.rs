//! Error types for file type prediction
//!
//! Every failure aborts the current call. The only tolerated condition is a
//! directory handed to batch prediction, which is skipped rather than
//! reported.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the prediction pipeline
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    /// Map an I/O error on `path`, keeping "not found" distinguishable
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.into())
        } else {
            Self::Io(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
