//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of feature-model invariants.
/// These are independent of transport and presentation concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Toggling a feature that is not in the loaded tree is a caller bug,
    /// not a user-facing condition.
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("duplicate feature name: {0}")]
    DuplicateFeature(String),

    #[error("model contains no features")]
    EmptyModel,

    #[error("invalid group tag '{tag}' on feature: {feature}")]
    InvalidGroup { feature: String, tag: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
