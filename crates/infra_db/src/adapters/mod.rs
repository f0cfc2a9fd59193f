//! Domain Adapters
//!
//! This module provides adapter implementations for the domain store
//! ports, connecting domain interfaces to the PostgreSQL layer.
//!
//! # Architecture
//!
//! Each domain has a corresponding adapter that:
//! - Implements the domain's store trait
//! - Translates between domain aggregates and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimStore;
//! use domain_claims::ClaimStore;
//!
//! let store = PostgresClaimStore::new(pool);
//! let claim = store.get(claim_id).await?;
//! ```

use core_kernel::PortError;

use crate::error::DatabaseError;

pub mod claims;
pub mod customers;
pub mod policies;

pub use claims::PostgresClaimStore;
pub use customers::PostgresCustomerStore;
pub use policies::PostgresPolicyStore;

/// Converts a database error to a port error.
///
/// NotFound is left to the caller, which knows the entity type and
/// identifier; anything reaching this function unhandled becomes
/// Internal.
pub(crate) fn db_to_port_error(error: DatabaseError) -> PortError {
    match error {
        DatabaseError::DuplicateEntry(msg) => PortError::conflict(msg),
        DatabaseError::PreconditionFailed(msg) => PortError::conflict(msg),
        DatabaseError::ForeignKeyViolation(msg) => PortError::validation(msg),
        DatabaseError::ConstraintViolation(msg) => PortError::validation(msg),
        DatabaseError::ConnectionFailed(msg) => PortError::connection(msg),
        DatabaseError::PoolExhausted => PortError::connection("connection pool exhausted"),
        DatabaseError::SerializationError(msg) => PortError::transformation(msg),
        other => PortError::internal(other.to_string()),
    }
}
