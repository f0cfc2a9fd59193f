//! Core Kernel - Foundational types shared by the claims engine
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers and actor references
//! - The authenticated actor model with role capabilities
//! - The port error vocabulary for the persistence boundary

pub mod actor;
pub mod identifiers;
pub mod money;
pub mod ports;

pub use actor::{Actor, Role, UnknownRole};
pub use identifiers::{ActorId, AgentId, ClaimId, CustomerId, DocumentId, PolicyId};
pub use money::{Currency, Money, MoneyError};
pub use ports::{DomainPort, PortError};
