//! Claims Management Domain
//!
//! This crate implements the claim lifecycle from submission through
//! settlement, including maturity payout calculation, role-based access
//! resolution, and the append-only claim timeline.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> Under Review -> Info Required -> Approved/Rejected -> Settled/Closed
//! ```
//!
//! Transitions are otherwise unrestricted; a move out of a terminal
//! status (Settled, Closed, Rejected) is permitted but logged.

pub mod access;
pub mod claim;
pub mod claim_number;
pub mod error;
pub mod maturity;
pub mod ports;
pub mod service;

pub use access::{AccessResolver, ClaimAction, ClaimScope};
pub use claim::{Claim, ClaimDocument, ClaimNote, ClaimStatus, ClaimType, TimelineEntry};
pub use error::ClaimError;
pub use maturity::{MaturityKind, MaturitySettlement};
pub use ports::{ClaimQuery, ClaimStore};
pub use service::{
    ClaimDetail, ClaimFilter, ClaimService, CustomerSummary, DocumentAttachment, OpenClaim,
    StatusChange,
};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockClaimStore;
