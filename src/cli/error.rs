//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<CliError>,
    },

    /// Script run to the end with failing lines; `first` decides the exit code.
    #[error("{failures} failing line(s)")]
    Failed {
        failures: usize,
        #[source]
        first: Box<CliError>,
    },
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
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Line { source, .. } => source.exit_code(),
            CliError::Failed { first, .. } => first.exit_code(),
            CliError::Infra(e) => match e {
                InfraError::Io { source, .. } => match source.kind() {
                    std::io::ErrorKind::NotFound => crate::exitcode::NOINPUT,
                    _ => crate::exitcode::IOERR,
                },
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) | ApplicationError::Validation(_) => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_domain_error_when_exit_code_then_dataerr() {
        let err: CliError = ApplicationError::from(DomainError::FixedColumn("code".into())).into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_line_error_when_exit_code_then_uses_inner_code() {
        let err = CliError::Line {
            line: 3,
            source: Box::new(CliError::Usage("bad".into())),
        };
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
        assert_eq!(err.to_string(), "line 3: bad");
    }

    #[test]
    fn given_failed_run_when_exit_code_then_uses_first_failure() {
        let fixed: CliError = ApplicationError::from(DomainError::FixedColumn("code".into())).into();
        let first = CliError::Line {
            line: 1,
            source: Box::new(fixed),
        };
        let err = CliError::Failed {
            failures: 2,
            first: Box::new(first),
        };
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(err.to_string(), "2 failing line(s)");
    }

    #[test]
    fn given_missing_file_when_exit_code_then_noinput() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CliError::from(InfraError::io("read script", io));
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }
}
