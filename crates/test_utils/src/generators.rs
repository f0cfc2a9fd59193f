//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants, plus fake-data helpers for
//! seeding realistic customer records.

use chrono::{Duration, NaiveDate};
use core_kernel::{AgentId, ClaimId, Currency, CustomerId, Money, PolicyId};
use domain_claims::{ClaimStatus, ClaimType};
use domain_policy::Tenure;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use proptest::prelude::*;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::JPY),
        Just(Currency::CHF),
        Just(Currency::INR),
        Just(Currency::AUD),
        Just(Currency::CAD),
        Just(Currency::SGD),
        Just(Currency::HKD),
    ]
}

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating valid amount ranges
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000i64
}

/// Strategy for generating valid Money values with positive amounts
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating valid Money values (can be negative)
pub fn money_strategy() -> impl Strategy<Value = Money> {
    (amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating valid USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::USD))
}

/// Strategy for generating claim types
pub fn claim_type_strategy() -> impl Strategy<Value = ClaimType> {
    prop_oneof![
        Just(ClaimType::Theft),
        Just(ClaimType::Accident),
        Just(ClaimType::Medical),
        Just(ClaimType::Death),
        Just(ClaimType::Fire),
        Just(ClaimType::Maturity),
        Just(ClaimType::Other),
    ]
}

/// Strategy for generating claim statuses
pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop_oneof![
        Just(ClaimStatus::Draft),
        Just(ClaimStatus::Submitted),
        Just(ClaimStatus::UnderReview),
        Just(ClaimStatus::InfoRequired),
        Just(ClaimStatus::Approved),
        Just(ClaimStatus::Rejected),
        Just(ClaimStatus::Settled),
        Just(ClaimStatus::Closed),
    ]
}

/// Strategy for generating policy tenures across all units
pub fn tenure_strategy() -> impl Strategy<Value = Tenure> {
    prop_oneof![
        (1u32..=40u32).prop_map(|v| Tenure::years(v).expect("Generated invalid tenure")),
        (1u32..=480u32).prop_map(|v| Tenure::months(v).expect("Generated invalid tenure")),
        (1u32..=3650u32).prop_map(|v| Tenure::days(v).expect("Generated invalid tenure")),
    ]
}

/// Strategy for generating purchase dates from 2020 onwards
pub fn purchase_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..=1460i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(days)
    })
}

/// Strategy for generating (purchase, incident) date pairs where the
/// incident never precedes the purchase
pub fn incident_after_purchase_strategy() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (purchase_date_strategy(), 0i64..=1000i64)
        .prop_map(|(purchase, offset)| (purchase, purchase + Duration::days(offset)))
}

/// Strategy for generating PolicyId
pub fn policy_id_strategy() -> impl Strategy<Value = PolicyId> {
    any::<[u8; 16]>().prop_map(|bytes| PolicyId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating ClaimId
pub fn claim_id_strategy() -> impl Strategy<Value = ClaimId> {
    any::<[u8; 16]>().prop_map(|bytes| ClaimId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating CustomerId
pub fn customer_id_strategy() -> impl Strategy<Value = CustomerId> {
    any::<[u8; 16]>().prop_map(|bytes| CustomerId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating AgentId
pub fn agent_id_strategy() -> impl Strategy<Value = AgentId> {
    any::<[u8; 16]>().prop_map(|bytes| AgentId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating claim descriptions that survive trimming
pub fn description_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{9,79}".prop_map(|s| s)
}

/// Generates a realistic customer name for seed data
pub fn fake_customer_name() -> String {
    Name().fake()
}

/// Generates a realistic email address for seed data
pub fn fake_email() -> String {
    SafeEmail().fake()
}

/// Generates a realistic phone number for seed data
pub fn fake_phone() -> String {
    PhoneNumber().fake()
}
