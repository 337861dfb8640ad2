//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Input error: blocks the upload before any request is sent
    #[error("model file not found: {0}")]
    FileNotFound(PathBuf),

    /// Input error: blocks the upload before any request is sent
    #[error("unsupported model file type: {path} (expected .{expected})")]
    UnsupportedFileType { path: PathBuf, expected: String },

    /// Upload failure: the backend's message where it supplied one,
    /// a generic message otherwise
    #[error("upload failed: {message}")]
    UploadFailed { message: String },

    /// Validation failure: surfaced generically, prior verdict preserved
    #[error("validation failed")]
    ValidationFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
