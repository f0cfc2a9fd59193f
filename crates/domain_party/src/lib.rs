//! Party Domain
//!
//! This crate manages customer accounts and the purchased policies recorded
//! against them. A purchased policy is the unit a claim runs against: opening
//! a claim reserves the entry (`active` to `claimed`), which is how the engine
//! keeps one live claim per purchased policy.
//!
//! # Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use core_kernel::PolicyId;
//! use domain_party::{Customer, PurchasedPolicy};
//!
//! let policy_id = PolicyId::new();
//! let purchase_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//!
//! let mut customer = Customer::new("Asha Rao")
//!     .with_email("asha@example.com")
//!     .with_policy(PurchasedPolicy::new(policy_id, purchase_date));
//!
//! customer.reserve_policy(policy_id).unwrap();
//! assert!(customer.reserve_policy(policy_id).is_err());
//! ```

pub mod customer;
pub mod error;
pub mod ports;

pub use customer::{Customer, PurchasedPolicy, PurchasedPolicyStatus};
pub use error::PartyError;
pub use ports::CustomerStore;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockCustomerStore;
