//! Policy Definition Domain
//!
//! This crate holds the policy-definition read model consumed by the claims
//! engine, following Domain-Driven Design (DDD) and Hexagonal Architecture
//! principles.
//!
//! # Architecture
//!
//! The domain layer is infrastructure-agnostic, containing only business logic:
//! - **Value Objects**: PolicyDefinition, Tenure
//! - **Ports**: PolicyStore read access with swappable adapters
//!
//! Maturity settlement needs exactly two facts about a product: its coverage
//! amount and its tenure. `Tenure::end_date` performs the calendar-aware
//! term arithmetic that anchors the proration calculation.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{PolicyDefinition, Tenure};
//!
//! let definition = PolicyDefinition::new(
//!     "Term Life 10",
//!     Money::new(dec!(10000), Currency::USD),
//!     Tenure::years(10)?,
//! )?;
//! let maturity_date = definition.tenure.end_date(purchase_date);
//! ```

pub mod definition;
pub mod error;
pub mod ports;
pub mod tenure;

pub use definition::PolicyDefinition;
pub use error::PolicyError;
pub use ports::PolicyStore;
pub use tenure::{Tenure, TenureUnit};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockPolicyStore;
