//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Docket
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DocketError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid recurrence pattern: {0}")]
    InvalidPattern(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocketError {
    /// Convenience constructor for not-found lookups keyed by entity + id.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }
}

/// Result type alias for Docket operations
pub type Result<T> = std::result::Result<T, DocketError>;
