//! Error types for harvest-scheduler
//!
//! The scheduling loop itself never fails; these cover loading and
//! validating configuration.

use thiserror::Error;

/// Result type for harvest-scheduler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in harvest-scheduler
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("RON serialize error: {0}")]
    RonSerialize(#[from] ron::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
