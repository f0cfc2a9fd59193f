//! Claims domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the claims domain
///
/// The boundary layer maps each variant to one HTTP status: `Validation`
/// and `InvalidState` to 400, `AccessDenied` to 403, `NotFound` to 404,
/// `Unavailable` to 500.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Missing or malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authenticated but not authorized for the target claim or customer
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Claim, policy, or customer absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Business precondition violated, e.g. policy not active or amount
    /// exceeding the eligible maturity payout
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Storage or transport failure; retryable by the caller, never
    /// retried internally
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ClaimError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(message.into())
    }

    /// Creates an AccessDenied error
    pub fn access_denied(message: impl Into<String>) -> Self {
        ClaimError::AccessDenied(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(message: impl Into<String>) -> Self {
        ClaimError::NotFound(message.into())
    }

    /// Creates an InvalidState error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        ClaimError::InvalidState(message.into())
    }

    /// Creates an Unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        ClaimError::Unavailable(message.into())
    }
}

impl From<PortError> for ClaimError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                ClaimError::NotFound(format!("{entity_type} {id} not found"))
            }
            PortError::Validation { message, .. } => ClaimError::Validation(message),
            // A storage conflict means a business precondition lost a race,
            // e.g. the purchased policy was reserved by a concurrent claim.
            PortError::Conflict { message } => ClaimError::InvalidState(message),
            other => ClaimError::Unavailable(other.to_string()),
        }
    }
}
