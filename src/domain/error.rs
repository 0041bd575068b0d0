//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business rule violations on the column forest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("fixed column cannot be modified: {0}")]
    FixedColumn(String),
}

/// Result type for domain rule checks.
pub type DomainResult<T> = Result<T, DomainError>;
