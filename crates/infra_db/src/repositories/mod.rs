//! Repository implementations for domain entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each domain aggregate. Repositories encapsulate
//! SQL queries and row types; mapping rows to domain aggregates is the
//! adapter layer's job.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-checked queries, so the crate builds without a database
//! - Transaction support for multi-row writes
//! - Optimistic preconditions via conditional UPDATEs where state
//!   transitions race

pub mod claims;
pub mod customers;
pub mod policies;

pub use claims::ClaimsRepository;
pub use customers::CustomerRepository;
pub use policies::PolicyRepository;
