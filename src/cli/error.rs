//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Application(app) => match app {
                    ApplicationError::FileNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::UnsupportedFileType { .. } => crate::exitcode::DATAERR,
                    ApplicationError::Domain(DomainError::UnknownFeature(_)) => {
                        crate::exitcode::SOFTWARE
                    }
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::UploadFailed { .. }
                    | ApplicationError::ValidationFailed { .. } => crate::exitcode::UNAVAILABLE,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
                },
                InfraError::Backend(_) => crate::exitcode::UNAVAILABLE,
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Dialog { .. } => crate::exitcode::SOFTWARE,
                InfraError::Editor { .. } => crate::exitcode::SOFTWARE,
            },
        }
    }
}
