//! Error types for harvest-core

use crate::{AreaId, EntityHandle, ResourceType};
use thiserror::Error;

/// Core error type
///
/// Only host-side mutation helpers fail. The scheduling path treats missing
/// entities and areas as steady-state conditions, never as errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityHandle),

    #[error("Resource type not found: {0}")]
    ResourceNotFound(ResourceType),

    #[error("Area not found: {0}")]
    AreaNotFound(AreaId),

    #[error("Invalid history: {0}")]
    InvalidHistory(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
