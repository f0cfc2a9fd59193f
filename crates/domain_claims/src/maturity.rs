//! Maturity settlement calculation
//!
//! Pure proration arithmetic with no side effects and no persistence:
//! given the purchase date, the policy tenure, the coverage amount, and
//! the settlement reference date, [`evaluate`] classifies the claim as
//! on-time or early and computes the payable amount. A claim at or past
//! the policy expiry pays the full coverage; an early claim pays the
//! coverage prorated by elapsed whole days over the total term.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::Money;
use domain_policy::Tenure;

/// Settlement classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaturityKind {
    /// Claimed at or past the policy expiry date; full coverage payable
    OnTime,
    /// Claimed before expiry; payable prorated by elapsed term
    Early,
}

impl MaturityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaturityKind::OnTime => "ON_TIME",
            MaturityKind::Early => "EARLY",
        }
    }
}

impl fmt::Display for MaturityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a maturity evaluation, embedded on maturity claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturitySettlement {
    pub kind: MaturityKind,
    pub policy_expiry_date: NaiveDate,
    /// Rounded to 2 decimal places, half away from zero
    pub payable_amount: Money,
}

/// Computes the maturity settlement for a purchased policy.
///
/// Expiry is calendar-aware: year and month tenures add to the date
/// components (month-end and leap-day clamped), day tenures add elapsed
/// days. The early ratio is elapsed whole days over total whole days,
/// floored at zero for claim dates before the purchase date. The payable
/// amount is always rounded to cents, half away from zero.
pub fn evaluate(
    purchase_date: NaiveDate,
    tenure: Tenure,
    coverage_amount: &Money,
    claim_date: NaiveDate,
) -> MaturitySettlement {
    let expiry_date = tenure.end_date(purchase_date);

    if claim_date >= expiry_date {
        return MaturitySettlement {
            kind: MaturityKind::OnTime,
            policy_expiry_date: expiry_date,
            payable_amount: coverage_amount.round_cents(),
        };
    }

    let total_days = (expiry_date - purchase_date).num_days();
    if total_days <= 0 {
        // Degenerate term; pay out in full rather than divide by zero.
        return MaturitySettlement {
            kind: MaturityKind::Early,
            policy_expiry_date: expiry_date,
            payable_amount: coverage_amount.round_cents(),
        };
    }

    let elapsed_days = (claim_date - purchase_date).num_days().max(0);
    let ratio = Decimal::from(elapsed_days) / Decimal::from(total_days);

    MaturitySettlement {
        kind: MaturityKind::Early,
        policy_expiry_date: expiry_date,
        payable_amount: coverage_amount.multiply(ratio).round_cents(),
    }
}
