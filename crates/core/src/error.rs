//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("invalid trajectory: {0}")]
    InvalidTrajectory(String),

    #[error("trajectory parse error: {0}")]
    TrajectoryParse(String),

    #[error("arithmetic overflow while computing trajectory of {0}")]
    Overflow(u64),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
