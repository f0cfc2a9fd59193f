//! Policy definition repository
//!
//! Read and insert access for the `policy_definitions` table. Definitions
//! are the catalog entries that purchased policies instantiate; the claims
//! engine reads them for coverage and tenure.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for policy definition data
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    /// Creates a new PolicyRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a policy definition by its identifier
    ///
    /// # Returns
    ///
    /// The definition row or `DatabaseError::NotFound`
    pub async fn get_by_id(&self, policy_id: Uuid) -> Result<PolicyDefinitionRow, DatabaseError> {
        sqlx::query_as::<_, PolicyDefinitionRow>(
            r#"
            SELECT
                policy_id, name, description, coverage_amount,
                coverage_currency, tenure_value, tenure_unit,
                is_active, created_at
            FROM policy_definitions
            WHERE policy_id = $1
            "#,
        )
        .bind(policy_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?
        .ok_or_else(|| DatabaseError::not_found("PolicyDefinition", policy_id))
    }

    /// Inserts a policy definition
    pub async fn insert(&self, row: &PolicyDefinitionRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO policy_definitions (
                policy_id, name, description, coverage_amount,
                coverage_currency, tenure_value, tenure_unit,
                is_active, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(row.policy_id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(row.coverage_amount)
        .bind(&row.coverage_currency)
        .bind(row.tenure_value)
        .bind(&row.tenure_unit)
        .bind(row.is_active)
        .bind(row.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(())
    }
}

/// Database row for a policy definition
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PolicyDefinitionRow {
    pub policy_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub coverage_amount: Decimal,
    pub coverage_currency: String,
    pub tenure_value: i32,
    pub tenure_unit: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
