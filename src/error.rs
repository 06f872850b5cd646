//! Error types for catalog, storage and session operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::InvalidAttributeCode;

/// Errors raised while enumerating or resolving sequences.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Configured dataset root does not exist
    #[error("Dataset root not found: {path:?}")]
    DatasetRootNotFound {
        /// Path that was configured as dataset root
        path: PathBuf,
    },

    /// No directory for the requested sequence
    #[error("Sequence '{id}' not found at {path:?}")]
    SequenceNotFound {
        /// Identifier that was requested
        id: String,
        /// Directory where the sequence was expected
        path: PathBuf,
    },

    /// Sequence directory has no frame image folder
    #[error("Image directory not found for '{id}': {path:?}")]
    ImageDirNotFound {
        /// Identifier of the sequence
        id: String,
        /// Expected image directory
        path: PathBuf,
    },

    /// I/O error while listing directories
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading or writing persisted labels.
#[derive(Error, Debug)]
pub enum LabelStoreError {
    /// Label file exists but cannot be decoded
    #[error("Malformed label file {path:?}: {message}")]
    Malformed {
        /// File that failed to decode
        path: PathBuf,
        /// What was wrong with it
        message: String,
    },

    /// Label file could not be written; the previous file is untouched
    #[error("Failed to write label file {path:?}: {message}")]
    WriteFailure {
        /// Destination of the failed write
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// I/O error while reading an existing label file
    #[error("IO error reading {path:?}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

impl LabelStoreError {
    /// Create a malformed-file error.
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a write failure.
    pub fn write_failure(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::WriteFailure {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Errors surfaced by [`AnnotationSession`](crate::AnnotationSession).
#[derive(Error, Debug)]
pub enum SessionError {
    /// Sequence could not be resolved or listed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Ground-truth file exists but could not be read
    #[error("Failed to read ground truth {path:?}: {source}")]
    GroundTruth {
        /// Ground-truth file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Labels could not be loaded or saved
    #[error(transparent)]
    LabelStore(#[from] LabelStoreError),

    /// Frame index outside the active sequence
    #[error("Frame index {index} out of range (sequence has {len} frames)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Frame count of the active sequence
        len: usize,
    },

    /// Attribute code outside the closed set
    #[error(transparent)]
    InvalidCode(#[from] InvalidAttributeCode),

    /// Operation requires a loaded sequence
    #[error("No sequence is loaded")]
    NoActiveSequence,
}

impl SessionError {
    /// Whether this error comes from a failed label write.
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            SessionError::LabelStore(LabelStoreError::WriteFailure { .. })
        )
    }
}
