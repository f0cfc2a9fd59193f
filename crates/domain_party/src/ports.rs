//! Customer persistence port
//!
//! [`CustomerStore`] is the storage seam for customer accounts and their
//! purchased policies. Reservation and release are port operations rather
//! than plain saves so adapters can make the status flip conditional at
//! write time; two claims racing for the same purchased policy must resolve
//! to one reservation and one conflict.

use async_trait::async_trait;

use core_kernel::{AgentId, CustomerId, DomainPort, PolicyId, PortError};

use crate::customer::Customer;

/// Port for reading and writing customer accounts
#[async_trait]
pub trait CustomerStore: DomainPort {
    /// Fetches a customer by id
    async fn get(&self, id: CustomerId) -> Result<Customer, PortError>;

    /// Stores a new customer account
    async fn insert(&self, customer: &Customer) -> Result<(), PortError>;

    /// Atomically flips a purchased policy from active to claimed.
    ///
    /// Returns `NotFound` when the customer or entry is absent and
    /// `Conflict` when the entry is not active, so a concurrent claim
    /// that won the reservation surfaces as a conflict here.
    async fn reserve_policy(
        &self,
        customer_id: CustomerId,
        policy_id: PolicyId,
    ) -> Result<(), PortError>;

    /// Puts a reserved purchased policy back to active.
    ///
    /// Compensating action for a claim that failed to persist after
    /// reserving its policy.
    async fn release_policy(
        &self,
        customer_id: CustomerId,
        policy_id: PolicyId,
    ) -> Result<(), PortError>;

    /// Ids of customers assigned to or registered by the agent
    async fn customer_ids_for_agent(
        &self,
        agent_id: AgentId,
    ) -> Result<Vec<CustomerId>, PortError>;

    /// Probes the backing store
    async fn ping(&self) -> Result<(), PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! In-memory mock for tests and local development

    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use super::*;
    use crate::error::PartyError;

    /// In-memory [`CustomerStore`] backed by a `HashMap`
    #[derive(Debug, Clone, Default)]
    pub struct MockCustomerStore {
        customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
    }

    impl MockCustomerStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds the store with customer accounts
        pub async fn with_customers(customers: Vec<Customer>) -> Self {
            let store = Self::new();
            {
                let mut guard = store.customers.write().await;
                for customer in customers {
                    guard.insert(customer.id, customer);
                }
            }
            store
        }

        fn reservation_error(err: PartyError) -> PortError {
            match err {
                PartyError::PolicyNotHeld(policy_id) => {
                    PortError::not_found("PurchasedPolicy", policy_id)
                }
                other => PortError::conflict(other.to_string()),
            }
        }
    }

    impl DomainPort for MockCustomerStore {}

    #[async_trait]
    impl CustomerStore for MockCustomerStore {
        async fn get(&self, id: CustomerId) -> Result<Customer, PortError> {
            self.customers
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Customer", id))
        }

        async fn insert(&self, customer: &Customer) -> Result<(), PortError> {
            let mut guard = self.customers.write().await;
            if guard.contains_key(&customer.id) {
                return Err(PortError::conflict(format!(
                    "customer {} already exists",
                    customer.id
                )));
            }
            guard.insert(customer.id, customer.clone());
            Ok(())
        }

        async fn reserve_policy(
            &self,
            customer_id: CustomerId,
            policy_id: PolicyId,
        ) -> Result<(), PortError> {
            // Check and flip under one write lock, matching the conditional
            // UPDATE a database adapter issues.
            let mut guard = self.customers.write().await;
            let customer = guard
                .get_mut(&customer_id)
                .ok_or_else(|| PortError::not_found("Customer", customer_id))?;
            customer
                .reserve_policy(policy_id)
                .map_err(Self::reservation_error)
        }

        async fn release_policy(
            &self,
            customer_id: CustomerId,
            policy_id: PolicyId,
        ) -> Result<(), PortError> {
            let mut guard = self.customers.write().await;
            let customer = guard
                .get_mut(&customer_id)
                .ok_or_else(|| PortError::not_found("Customer", customer_id))?;
            customer
                .release_policy(policy_id)
                .map_err(Self::reservation_error)
        }

        async fn customer_ids_for_agent(
            &self,
            agent_id: AgentId,
        ) -> Result<Vec<CustomerId>, PortError> {
            let guard = self.customers.read().await;
            Ok(guard
                .values()
                .filter(|c| c.is_serviced_by(agent_id))
                .map(|c| c.id)
                .collect())
        }

        async fn ping(&self) -> Result<(), PortError> {
            Ok(())
        }
    }
}
