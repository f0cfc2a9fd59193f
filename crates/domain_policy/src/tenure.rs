//! Policy tenure and calendar-aware term arithmetic
//!
//! A tenure is the duration of a policy term, expressed as a value plus a
//! unit. Term-end arithmetic is calendar-aware: years and months move the
//! date components (with month-end and leap-day clamping), while days add
//! as elapsed days.

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PolicyError;

/// Unit of a policy tenure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenureUnit {
    Days,
    Months,
    Years,
}

impl TenureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenureUnit::Days => "days",
            TenureUnit::Months => "months",
            TenureUnit::Years => "years",
        }
    }
}

impl fmt::Display for TenureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TenureUnit {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(TenureUnit::Days),
            "month" | "months" => Ok(TenureUnit::Months),
            "year" | "years" => Ok(TenureUnit::Years),
            other => Err(PolicyError::UnknownTenureUnit(other.to_string())),
        }
    }
}

/// A policy term length: value plus unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenure {
    value: u32,
    unit: TenureUnit,
}

impl Tenure {
    /// Creates a tenure, rejecting a zero-length term
    pub fn new(value: u32, unit: TenureUnit) -> Result<Self, PolicyError> {
        if value == 0 {
            return Err(PolicyError::validation("tenure value must be positive"));
        }
        Ok(Self { value, unit })
    }

    pub fn years(value: u32) -> Result<Self, PolicyError> {
        Self::new(value, TenureUnit::Years)
    }

    pub fn months(value: u32) -> Result<Self, PolicyError> {
        Self::new(value, TenureUnit::Months)
    }

    pub fn days(value: u32) -> Result<Self, PolicyError> {
        Self::new(value, TenureUnit::Days)
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn unit(&self) -> TenureUnit {
        self.unit
    }

    /// Computes the term-end date from a start date.
    ///
    /// Month and year arithmetic clamps to the last valid day of the target
    /// month, so Jan 31 + 1 month lands on Feb 28 (or 29) and Feb 29 plus a
    /// year lands on Feb 28. Day arithmetic is exact elapsed days.
    pub fn end_date(&self, from: NaiveDate) -> NaiveDate {
        match self.unit {
            TenureUnit::Days => from + Duration::days(i64::from(self.value)),
            TenureUnit::Months => from
                .checked_add_months(Months::new(self.value))
                .unwrap_or_else(|| from + Duration::days(30 * i64::from(self.value))),
            TenureUnit::Years => from
                .checked_add_months(Months::new(self.value.saturating_mul(12)))
                .unwrap_or_else(|| from + Duration::days(365 * i64::from(self.value))),
        }
    }

    /// Whole days between the start date and the term end
    pub fn total_days(&self, from: NaiveDate) -> i64 {
        (self.end_date(from) - from).num_days()
    }
}

impl fmt::Display for Tenure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
