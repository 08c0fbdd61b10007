//! Error taxonomy for marketplace API interactions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One field-level validation failure reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Server-side field name the error applies to.
    pub field: String,
    /// Human-readable message for inline rendering.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Failure of a marketplace API call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The entity does not exist or is not visible to this host.
    #[error("experience not found")]
    NotFound,

    /// The bearer token is missing, expired, or invalid.
    #[error("session expired, please sign in again")]
    Unauthorized,

    /// Authenticated but not permitted to edit this entity.
    #[error("you are not allowed to edit this experience")]
    Forbidden,

    /// The server rejected the payload with field-level detail.
    #[error("{}", validation_summary(.0))]
    Validation(Vec<FieldError>),

    /// Network, encoding, or unexpected-response failure.
    #[error("request failed: {0}")]
    Transport(String),
}

fn validation_summary(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return "validation failed".to_owned();
    }
    let parts: Vec<String> = errors.iter().map(ToString::to_string).collect();
    parts.join("; ")
}
