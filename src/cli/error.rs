//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_)
                | ApplicationError::InvalidEdge { .. }
                | ApplicationError::Json(_) => crate::exitcode::DATAERR,
                ApplicationError::InputNotFound(_) => crate::exitcode::NOINPUT,
                ApplicationError::Io { .. } => crate::exitcode::IOERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use std::path::PathBuf;

    #[test]
    fn given_cycle_error_when_mapping_exit_code_then_is_data_error() {
        let err = CliError::from(ApplicationError::from(DomainError::CycleDetected));
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(err.to_string(), "cycle detected in hierarchy");
    }

    #[test]
    fn given_missing_input_when_mapping_exit_code_then_is_no_input() {
        let err = CliError::from(ApplicationError::InputNotFound(PathBuf::from("x.txt")));
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }
}
