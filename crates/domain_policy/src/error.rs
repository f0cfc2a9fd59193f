//! Policy domain errors

use thiserror::Error;

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Tenure unit string could not be parsed
    #[error("Unknown tenure unit: {0}")]
    UnknownTenureUnit(String),
}

impl PolicyError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PolicyError::Validation(message.into())
    }
}
