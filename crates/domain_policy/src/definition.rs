//! Policy definitions
//!
//! A policy definition is the product template a customer purchases: a
//! coverage amount and a term length. The claims engine reads definitions
//! to price maturity settlements; it never mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Money, PolicyId};

use crate::error::PolicyError;
use crate::tenure::Tenure;

/// A purchasable policy product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDefinition {
    pub id: PolicyId,
    pub name: String,
    pub description: Option<String>,
    /// Sum assured paid in full at on-time maturity
    pub coverage_amount: Money,
    /// Term length from purchase to maturity
    pub tenure: Tenure,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PolicyDefinition {
    pub fn new(
        name: impl Into<String>,
        coverage_amount: Money,
        tenure: Tenure,
    ) -> Result<Self, PolicyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PolicyError::validation("policy name must not be empty"));
        }
        if !coverage_amount.is_positive() {
            return Err(PolicyError::validation("coverage amount must be positive"));
        }

        Ok(Self {
            id: PolicyId::new_v7(),
            name,
            description: None,
            coverage_amount,
            tenure,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_definition_creation() {
        let definition = PolicyDefinition::new(
            "Term Life 10",
            Money::new(dec!(10000), Currency::USD),
            Tenure::years(10).unwrap(),
        )
        .unwrap();

        assert_eq!(definition.name, "Term Life 10");
        assert!(definition.is_active);
        assert_eq!(definition.tenure.value(), 10);
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = PolicyDefinition::new(
            "   ",
            Money::new(dec!(10000), Currency::USD),
            Tenure::years(10).unwrap(),
        );
        assert!(matches!(result, Err(PolicyError::Validation(_))));
    }

    #[test]
    fn test_non_positive_coverage_rejected() {
        let result = PolicyDefinition::new(
            "Term Life 10",
            Money::zero(Currency::USD),
            Tenure::years(10).unwrap(),
        );
        assert!(matches!(result, Err(PolicyError::Validation(_))));
    }

    #[test]
    fn test_with_description() {
        let definition = PolicyDefinition::new(
            "Health Shield",
            Money::new(dec!(5000), Currency::USD),
            Tenure::months(18).unwrap(),
        )
        .unwrap()
        .with_description("Hospitalization cover");

        assert_eq!(
            definition.description.as_deref(),
            Some("Hospitalization cover")
        );
    }
}
