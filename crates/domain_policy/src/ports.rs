//! Policy Domain Ports
//!
//! This module defines the port interface for reading policy definitions,
//! enabling swappable implementations (PostgreSQL, mock).
//!
//! The claims engine treats policy definitions as a read-only collaborator:
//! it loads them to price maturity settlements and to validate purchased
//! policies, but never changes them. The `insert_definition` operation
//! exists for provisioning and test seeding.

use async_trait::async_trait;

use core_kernel::{DomainPort, PolicyId, PortError};

use crate::definition::PolicyDefinition;

/// Port for policy-definition read access
#[async_trait]
pub trait PolicyStore: DomainPort {
    /// Retrieves a policy definition by ID
    ///
    /// # Returns
    ///
    /// The definition if found, or `PortError::NotFound`
    async fn get_definition(&self, id: PolicyId) -> Result<PolicyDefinition, PortError>;

    /// Stores a new policy definition
    async fn insert_definition(&self, definition: &PolicyDefinition) -> Result<(), PortError>;

    /// Verifies the store is reachable
    async fn ping(&self) -> Result<(), PortError>;
}

/// Mock implementation of PolicyStore for testing
///
/// Stores definitions in memory so domain and interface tests run without
/// a database.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of PolicyStore
    #[derive(Debug, Clone, Default)]
    pub struct MockPolicyStore {
        definitions: Arc<RwLock<HashMap<PolicyId, PolicyDefinition>>>,
    }

    impl MockPolicyStore {
        /// Creates a new mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with definitions for testing
        pub async fn with_definitions(definitions: Vec<PolicyDefinition>) -> Self {
            let store = Self::new();
            for definition in definitions {
                store
                    .definitions
                    .write()
                    .await
                    .insert(definition.id, definition);
            }
            store
        }
    }

    impl DomainPort for MockPolicyStore {}

    #[async_trait]
    impl PolicyStore for MockPolicyStore {
        async fn get_definition(&self, id: PolicyId) -> Result<PolicyDefinition, PortError> {
            self.definitions
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("PolicyDefinition", id))
        }

        async fn insert_definition(&self, definition: &PolicyDefinition) -> Result<(), PortError> {
            self.definitions
                .write()
                .await
                .insert(definition.id, definition.clone());
            Ok(())
        }

        async fn ping(&self) -> Result<(), PortError> {
            Ok(())
        }
    }
}
