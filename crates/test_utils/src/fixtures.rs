//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the claims engine.
//! Fixtures are deterministic so tests stay predictable.

use chrono::NaiveDate;
use core_kernel::{Actor, ActorId, AgentId, ClaimId, Currency, CustomerId, Money, PolicyId};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Creates a standard USD amount for testing
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// Creates a coverage amount for a mid-size policy
    pub fn usd_coverage() -> Money {
        Money::new(dec!(10000.00), Currency::USD)
    }

    /// Creates a requested amount for a small claim
    pub fn usd_requested() -> Money {
        Money::new(dec!(250.00), Currency::USD)
    }

    /// Creates a zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// Creates a EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }

    /// Creates a JPY amount (zero decimal places)
    pub fn jpy_10000() -> Money {
        Money::new(dec!(10000), Currency::JPY)
    }
}

/// Fixture for date test data
pub struct DateFixtures;

impl DateFixtures {
    /// Standard policy purchase date (Jan 1, 2023)
    pub fn purchase_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    /// Incident date halfway through the first policy year
    pub fn incident_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 15).unwrap()
    }

    /// Expiry of a one-year policy bought on the standard purchase date
    pub fn one_year_expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// A surrender date roughly half way through a one-year term
    pub fn mid_term() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, 2).unwrap()
    }

    /// A date after the one-year expiry for late maturity submissions
    pub fn after_expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic policy ID for testing
    pub fn policy_id() -> PolicyId {
        PolicyId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a deterministic claim ID for testing
    pub fn claim_id() -> ClaimId {
        ClaimId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic customer ID for testing
    pub fn customer_id() -> CustomerId {
        CustomerId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// Creates a deterministic agent ID for testing
    pub fn agent_id() -> AgentId {
        AgentId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }

    /// Creates a deterministic admin actor ID for testing
    pub fn admin_id() -> ActorId {
        ActorId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440005").unwrap())
    }
}

/// Fixture for actors in each role
pub struct ActorFixtures;

impl ActorFixtures {
    /// Admin actor with a deterministic id
    pub fn admin() -> Actor {
        Actor::Admin(IdFixtures::admin_id())
    }

    /// Agent actor matching [`IdFixtures::agent_id`]
    pub fn agent() -> Actor {
        Actor::Agent(IdFixtures::agent_id())
    }

    /// Customer actor matching [`IdFixtures::customer_id`]
    pub fn customer() -> Actor {
        Actor::Customer(IdFixtures::customer_id())
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// Well-formed claim number
    pub fn claim_number() -> &'static str {
        "CLM-123456-042"
    }

    /// Standard policy name
    pub fn policy_name() -> &'static str {
        "Term Shield 1Y"
    }

    /// Standard customer name
    pub fn customer_name() -> &'static str {
        "Asha Rao"
    }

    /// Test email address
    pub fn email() -> &'static str {
        "asha.rao@example.com"
    }

    /// Test phone number
    pub fn phone() -> &'static str {
        "+1-555-123-4567"
    }

    /// Incident description for theft claims
    pub fn description() -> &'static str {
        "Bicycle stolen from garage"
    }
}
