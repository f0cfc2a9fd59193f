//! PostgreSQL Customer Store Adapter
//!
//! Implements the `CustomerStore` port on top of the
//! `CustomerRepository`. The reservation operations delegate to the
//! repository's conditional UPDATEs, so the status precondition is
//! checked at write time by the database rather than in process.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{ActorId, AgentId, CustomerId, DomainPort, PolicyId, PortError};
use domain_party::{Customer, CustomerStore, PurchasedPolicy, PurchasedPolicyStatus};

use crate::adapters::db_to_port_error;
use crate::repositories::customers::{
    CustomerRepository, CustomerRow, CustomerWithPolicies, PurchasedPolicyRow,
};

/// PostgreSQL-backed implementation of the CustomerStore port
#[derive(Debug, Clone)]
pub struct PostgresCustomerStore {
    repository: CustomerRepository,
    pool: PgPool,
}

impl PostgresCustomerStore {
    /// Creates a new PostgreSQL customer store
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CustomerRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresCustomerStore {}

#[async_trait]
impl CustomerStore for PostgresCustomerStore {
    #[instrument(skip(self), fields(customer_id = %id))]
    async fn get(&self, id: CustomerId) -> Result<Customer, PortError> {
        debug!("fetching customer by id");

        let data = self.repository.get_with_policies(id.into()).await.map_err(|e| {
            if e.is_not_found() {
                PortError::not_found("Customer", id)
            } else {
                db_to_port_error(e)
            }
        })?;

        rows_to_customer(data)
    }

    #[instrument(skip(self, customer), fields(customer_id = %customer.id))]
    async fn insert(&self, customer: &Customer) -> Result<(), PortError> {
        debug!("inserting customer");

        let (row, policies) = customer_to_rows(customer);
        self.repository
            .insert(&row, &policies)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(customer_id = %customer_id, policy_id = %policy_id))]
    async fn reserve_policy(
        &self,
        customer_id: CustomerId,
        policy_id: PolicyId,
    ) -> Result<(), PortError> {
        debug!("reserving purchased policy");

        self.repository
            .reserve_policy(customer_id.into(), policy_id.into())
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    PortError::not_found("PurchasedPolicy", policy_id)
                } else {
                    db_to_port_error(e)
                }
            })
    }

    #[instrument(skip(self), fields(customer_id = %customer_id, policy_id = %policy_id))]
    async fn release_policy(
        &self,
        customer_id: CustomerId,
        policy_id: PolicyId,
    ) -> Result<(), PortError> {
        debug!("releasing purchased policy");

        self.repository
            .release_policy(customer_id.into(), policy_id.into())
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    PortError::not_found("PurchasedPolicy", policy_id)
                } else {
                    db_to_port_error(e)
                }
            })
    }

    #[instrument(skip(self), fields(agent_id = %agent_id))]
    async fn customer_ids_for_agent(
        &self,
        agent_id: AgentId,
    ) -> Result<Vec<CustomerId>, PortError> {
        debug!("resolving agent book");

        let ids = self
            .repository
            .customer_ids_for_agent(agent_id.into())
            .await
            .map_err(db_to_port_error)?;

        Ok(ids.into_iter().map(CustomerId::from).collect())
    }

    async fn ping(&self) -> Result<(), PortError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::connection(e.to_string()))?;
        Ok(())
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn rows_to_customer(data: CustomerWithPolicies) -> Result<Customer, PortError> {
    let policies = data
        .policies
        .into_iter()
        .map(policy_row_to_entry)
        .collect::<Result<Vec<_>, _>>()?;

    let row = data.customer;
    Ok(Customer {
        id: CustomerId::from(row.customer_id),
        name: row.name,
        email: row.email,
        phone: row.phone,
        assigned_agent_id: row.assigned_agent_id.map(AgentId::from),
        created_by: row.created_by.map(ActorId::from),
        policies,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn policy_row_to_entry(row: PurchasedPolicyRow) -> Result<PurchasedPolicy, PortError> {
    let status = PurchasedPolicyStatus::from_str(&row.status)
        .map_err(|e| PortError::transformation(e.to_string()))?;

    Ok(PurchasedPolicy {
        policy_id: PolicyId::from(row.policy_id),
        purchase_date: row.purchase_date,
        agent_id: row.agent_id.map(AgentId::from),
        status,
        claimed_at: row.claimed_at,
    })
}

fn customer_to_rows(customer: &Customer) -> (CustomerRow, Vec<PurchasedPolicyRow>) {
    let row = CustomerRow {
        customer_id: customer.id.into(),
        name: customer.name.clone(),
        email: customer.email.clone(),
        phone: customer.phone.clone(),
        assigned_agent_id: customer.assigned_agent_id.map(Into::into),
        created_by: customer.created_by.map(Into::into),
        created_at: customer.created_at,
        updated_at: customer.updated_at,
    };

    let policies = customer
        .policies
        .iter()
        .map(|entry| PurchasedPolicyRow {
            customer_id: customer.id.into(),
            policy_id: entry.policy_id.into(),
            purchase_date: entry.purchase_date,
            agent_id: entry.agent_id.map(Into::into),
            status: entry.status.as_str().to_string(),
            claimed_at: entry.claimed_at,
        })
        .collect();

    (row, policies)
}
