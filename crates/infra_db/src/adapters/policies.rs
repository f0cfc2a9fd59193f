//! PostgreSQL Policy Store Adapter
//!
//! Implements the `PolicyStore` port over the `policy_definitions` table.
//! Coverage money is stored as a NUMERIC amount plus a currency code
//! column and reassembled here.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{Currency, DomainPort, Money, PolicyId, PortError};
use domain_policy::{PolicyDefinition, PolicyStore, Tenure, TenureUnit};

use crate::adapters::db_to_port_error;
use crate::repositories::policies::{PolicyDefinitionRow, PolicyRepository};

/// PostgreSQL-backed implementation of the PolicyStore port
#[derive(Debug, Clone)]
pub struct PostgresPolicyStore {
    repository: PolicyRepository,
    pool: PgPool,
}

impl PostgresPolicyStore {
    /// Creates a new PostgreSQL policy store
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PolicyRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresPolicyStore {}

#[async_trait]
impl PolicyStore for PostgresPolicyStore {
    #[instrument(skip(self), fields(policy_id = %id))]
    async fn get_definition(&self, id: PolicyId) -> Result<PolicyDefinition, PortError> {
        debug!("fetching policy definition");

        let row = self.repository.get_by_id(id.into()).await.map_err(|e| {
            if e.is_not_found() {
                PortError::not_found("PolicyDefinition", id)
            } else {
                db_to_port_error(e)
            }
        })?;

        row_to_definition(row)
    }

    #[instrument(skip(self, definition), fields(policy_id = %definition.id))]
    async fn insert_definition(&self, definition: &PolicyDefinition) -> Result<(), PortError> {
        debug!("inserting policy definition");

        let row = definition_to_row(definition);
        self.repository.insert(&row).await.map_err(db_to_port_error)
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

fn row_to_definition(row: PolicyDefinitionRow) -> Result<PolicyDefinition, PortError> {
    let currency = Currency::from_str(&row.coverage_currency)
        .map_err(|e| PortError::transformation(e.to_string()))?;
    let unit = TenureUnit::from_str(&row.tenure_unit)
        .map_err(|e| PortError::transformation(e.to_string()))?;
    let value = u32::try_from(row.tenure_value).map_err(|_| {
        PortError::transformation(format!("tenure value {} out of range", row.tenure_value))
    })?;
    let tenure =
        Tenure::new(value, unit).map_err(|e| PortError::transformation(e.to_string()))?;

    Ok(PolicyDefinition {
        id: PolicyId::from(row.policy_id),
        name: row.name,
        description: row.description,
        coverage_amount: Money::new(row.coverage_amount, currency),
        tenure,
        is_active: row.is_active,
        created_at: row.created_at,
    })
}

fn definition_to_row(definition: &PolicyDefinition) -> PolicyDefinitionRow {
    PolicyDefinitionRow {
        policy_id: definition.id.into(),
        name: definition.name.clone(),
        description: definition.description.clone(),
        coverage_amount: definition.coverage_amount.amount(),
        coverage_currency: definition.coverage_amount.currency().code().to_string(),
        tenure_value: definition.tenure.value() as i32,
        tenure_unit: definition.tenure.unit().as_str().to_string(),
        is_active: definition.is_active,
        created_at: definition.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn term_shield() -> PolicyDefinition {
        PolicyDefinition::new(
            "Term Shield 1Y",
            Money::new(dec!(10000), Currency::USD),
            Tenure::years(1).unwrap(),
        )
        .unwrap()
        .with_description("One year term cover")
    }

    #[test]
    fn test_definition_survives_row_round_trip() {
        let definition = term_shield();
        let row = definition_to_row(&definition);
        let back = row_to_definition(row).unwrap();

        assert_eq!(back, definition);
    }

    #[test]
    fn test_row_carries_currency_code_and_unit() {
        let row = definition_to_row(&term_shield());

        assert_eq!(row.coverage_currency, "USD");
        assert_eq!(row.tenure_value, 1);
        assert_eq!(row.tenure_unit, "years");
    }

    #[test]
    fn test_unknown_currency_is_transformation_error() {
        let mut row = definition_to_row(&term_shield());
        row.coverage_currency = "ZZZ".to_string();

        let err = row_to_definition(row).unwrap_err();
        assert!(matches!(err, PortError::Transformation { .. }));
    }

    #[test]
    fn test_zero_tenure_is_transformation_error() {
        let mut row = definition_to_row(&term_shield());
        row.tenure_value = 0;

        let err = row_to_definition(row).unwrap_err();
        assert!(matches!(err, PortError::Transformation { .. }));
    }
}
