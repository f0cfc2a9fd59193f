//! Party domain errors

use thiserror::Error;

use core_kernel::PolicyId;

use crate::customer::PurchasedPolicyStatus;

/// Errors that can occur in the party domain
#[derive(Debug, Error)]
pub enum PartyError {
    /// Customer does not hold the referenced policy
    #[error("Customer does not hold policy {0}")]
    PolicyNotHeld(PolicyId),

    /// Purchased entry exists but is not in a claimable status
    #[error("Purchased policy {policy} is {status} and cannot back a claim")]
    PolicyNotClaimable {
        policy: PolicyId,
        status: PurchasedPolicyStatus,
    },

    /// Release attempted on an entry that was never reserved
    #[error("Purchased policy {0} is not reserved")]
    PolicyNotReserved(PolicyId),

    /// Invalid customer data provided
    #[error("Invalid customer data: {0}")]
    Validation(String),
}

impl PartyError {
    /// Creates a Validation error with a message
    pub fn validation(message: impl Into<String>) -> Self {
        PartyError::Validation(message.into())
    }
}
