//! Errors returned by the domain services.

use shared::filters::FilterParseError;
use shared::{PayableValidationError, PaymentValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// The request is malformed or breaks a business rule
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// File system or encoding failure below the domain
    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<PayableValidationError> for DomainError {
    fn from(e: PayableValidationError) -> Self {
        DomainError::Validation(e.to_string())
    }
}

impl From<PaymentValidationError> for DomainError {
    fn from(e: PaymentValidationError) -> Self {
        DomainError::Validation(e.to_string())
    }
}

impl From<FilterParseError> for DomainError {
    fn from(e: FilterParseError) -> Self {
        DomainError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_errors_become_validation() {
        let err: DomainError = PayableValidationError::EmptyConcept.into();
        assert!(matches!(err, DomainError::Validation(ref m) if m == "El concepto es obligatorio"));

        let err: DomainError = FilterParseError::InvalidMonth("13".to_string()).into();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_storage_error_keeps_context() {
        let err: DomainError = anyhow::anyhow!("disk full").context("Failed to write cuentas_pagar.csv").into();
        assert_eq!(err.to_string(), "Storage error: Failed to write cuentas_pagar.csv: disk full");
    }
}
