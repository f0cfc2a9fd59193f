//! Customer repository
//!
//! Database access for customer accounts and their purchased-policy
//! entries. The purchased-policy status column carries the reservation
//! that enforces one live claim per entry: `reserve` and `release` are
//! single conditional UPDATEs whose row count tells whether the
//! precondition held at write time.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for customer and purchased-policy data
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a customer with all purchased-policy entries
    ///
    /// # Returns
    ///
    /// The customer and their entries, or `DatabaseError::NotFound`
    pub async fn get_with_policies(
        &self,
        customer_id: Uuid,
    ) -> Result<CustomerWithPolicies, DatabaseError> {
        let customer = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT
                customer_id, name, email, phone, assigned_agent_id,
                created_by, created_at, updated_at
            FROM customers
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?
        .ok_or_else(|| DatabaseError::not_found("Customer", customer_id))?;

        let policies = sqlx::query_as::<_, PurchasedPolicyRow>(
            r#"
            SELECT
                customer_id, policy_id, purchase_date, agent_id,
                status, claimed_at
            FROM purchased_policies
            WHERE customer_id = $1
            ORDER BY purchase_date
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(CustomerWithPolicies { customer, policies })
    }

    /// Inserts a customer and their purchased-policy entries in one
    /// transaction
    pub async fn insert(
        &self,
        customer: &CustomerRow,
        policies: &[PurchasedPolicyRow],
    ) -> Result<(), DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        sqlx::query(
            r#"
            INSERT INTO customers (
                customer_id, name, email, phone, assigned_agent_id,
                created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(customer.customer_id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.assigned_agent_id)
        .bind(customer.created_by)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        for policy in policies {
            sqlx::query(
                r#"
                INSERT INTO purchased_policies (
                    customer_id, policy_id, purchase_date, agent_id,
                    status, claimed_at
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(policy.customer_id)
            .bind(policy.policy_id)
            .bind(policy.purchase_date)
            .bind(policy.agent_id)
            .bind(&policy.status)
            .bind(policy.claimed_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from(&e))?;
        }

        tx.commit().await.map_err(|e| DatabaseError::from(&e))?;
        Ok(())
    }

    /// Reserves a purchased-policy entry for a claim.
    ///
    /// The UPDATE requires `status = 'active'` at write time, so two
    /// racing claims resolve to one winner. A zero row count is
    /// disambiguated with a follow-up status read.
    pub async fn reserve_policy(
        &self,
        customer_id: Uuid,
        policy_id: Uuid,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE purchased_policies
            SET status = 'claimed', claimed_at = $3
            WHERE customer_id = $1 AND policy_id = $2 AND status = 'active'
            "#,
        )
        .bind(customer_id)
        .bind(policy_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        if result.rows_affected() == 0 {
            return Err(self.reservation_failure(customer_id, policy_id, "active").await);
        }

        self.touch_customer(customer_id).await
    }

    /// Puts a reserved entry back to active; the compensating action for
    /// a failed claim insert
    pub async fn release_policy(
        &self,
        customer_id: Uuid,
        policy_id: Uuid,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE purchased_policies
            SET status = 'active', claimed_at = NULL
            WHERE customer_id = $1 AND policy_id = $2 AND status = 'claimed'
            "#,
        )
        .bind(customer_id)
        .bind(policy_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        if result.rows_affected() == 0 {
            return Err(self.reservation_failure(customer_id, policy_id, "claimed").await);
        }

        self.touch_customer(customer_id).await
    }

    /// Identifiers of every customer the agent services, either by
    /// assignment or by having registered the account
    pub async fn customer_ids_for_agent(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<Uuid>, DatabaseError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT customer_id
            FROM customers
            WHERE assigned_agent_id = $1 OR created_by = $1
            "#,
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))
    }

    /// Explains a conditional UPDATE that matched no row: either the entry
    /// does not exist, or its status was not the expected one.
    async fn reservation_failure(
        &self,
        customer_id: Uuid,
        policy_id: Uuid,
        expected: &str,
    ) -> DatabaseError {
        let status = sqlx::query_scalar::<_, String>(
            r#"
            SELECT status FROM purchased_policies
            WHERE customer_id = $1 AND policy_id = $2
            "#,
        )
        .bind(customer_id)
        .bind(policy_id)
        .fetch_optional(&self.pool)
        .await;

        match status {
            Ok(Some(actual)) => DatabaseError::PreconditionFailed(format!(
                "purchased policy {} is {}, expected {}",
                policy_id, actual, expected
            )),
            Ok(None) => DatabaseError::not_found("PurchasedPolicy", policy_id),
            Err(e) => DatabaseError::from(&e),
        }
    }

    async fn touch_customer(&self, customer_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE customers SET updated_at = $2 WHERE customer_id = $1")
            .bind(customer_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;
        Ok(())
    }
}

/// Database row for a customer account
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub customer_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub assigned_agent_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for a purchased-policy entry
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PurchasedPolicyRow {
    pub customer_id: Uuid,
    pub policy_id: Uuid,
    pub purchase_date: NaiveDate,
    pub agent_id: Option<Uuid>,
    pub status: String,
    pub claimed_at: Option<DateTime<Utc>>,
}

/// A customer joined with their purchased-policy entries
#[derive(Debug, Clone)]
pub struct CustomerWithPolicies {
    pub customer: CustomerRow,
    pub policies: Vec<PurchasedPolicyRow>,
}
