//! Error handling module for nested installer processing
//!
//! Nested-metadata validation failures have their own aggregated type
//! (`ValidationErrorList`); this module holds the crate-level error for
//! malformed manifests and policies.

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum NestingError {
    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Policy errors (loading, bounds)
    #[error("Policy error: {0}")]
    Policy(String),

    /// Manifest shape errors not covered by nested-metadata validation
    #[error("Manifest error: {0}")]
    Manifest(String),
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, NestingError>;

impl NestingError {
    /// Create a policy error
    pub fn policy(msg: impl Into<String>) -> Self {
        Self::Policy(msg.into())
    }

    /// Create a manifest error
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest(msg.into())
    }
}
