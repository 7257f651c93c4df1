//! Cache error types.

use std::fmt;
use thiserror::Error;

/// One of the two stores behind the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Metadata,
    Blob,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Metadata => "metadata",
            Backend::Blob => "blob",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache operation errors.
///
/// Misses and duplicate writes are outcomes, not errors; see
/// [`crate::ReadOutcome`] and [`crate::WriteOutcome`].
#[derive(Debug, Error)]
pub enum CacheError {
    /// A lookup failed or timed out. Never reported as a miss.
    #[error("{backend} store unavailable: {reason}")]
    StoreUnavailable { backend: Backend, reason: String },

    /// A write failed. With `stage == Metadata` the blob is left behind.
    #[error("write failed at {stage} stage: {reason}")]
    WriteFailed { stage: Backend, reason: String },

    /// The record was rejected before any I/O.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The side computation for a miss failed.
    #[error("computation failed: {0}")]
    Compute(#[from] syracuse_core::Error),
}

impl CacheError {
    pub(crate) fn unavailable(backend: Backend, reason: impl fmt::Display) -> Self {
        CacheError::StoreUnavailable {
            backend,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write_failed(stage: Backend, reason: impl fmt::Display) -> Self {
        CacheError::WriteFailed {
            stage,
            reason: reason.to_string(),
        }
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
