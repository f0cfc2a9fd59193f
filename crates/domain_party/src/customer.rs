//! Customer aggregate and purchased policies
//!
//! A customer owns the purchased-policy entries recorded against their
//! account. Each entry tracks its own lifecycle status; the claims engine
//! flips an entry from `Active` to `Claimed` when a claim is opened against
//! it, which is what enforces "one live claim per purchased policy".
//!
//! # Agent relations
//!
//! Two relations drive agent visibility: `assigned_agent_id` (the agent
//! currently servicing the account) and `created_by` (whoever registered
//! the customer record, agent or admin). An agent holding either relation
//! may view and act on the customer's claims.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ActorId, AgentId, CustomerId, PolicyId};

use crate::error::PartyError;

/// Lifecycle status of a purchased-policy entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchasedPolicyStatus {
    /// Purchased and claimable
    Active,
    /// Reserved by an open claim
    Claimed,
    /// Term ended without a claim
    Expired,
    /// Cancelled before term end
    Cancelled,
}

impl PurchasedPolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchasedPolicyStatus::Active => "active",
            PurchasedPolicyStatus::Claimed => "claimed",
            PurchasedPolicyStatus::Expired => "expired",
            PurchasedPolicyStatus::Cancelled => "cancelled",
        }
    }

    /// Only active entries may back a new claim
    pub fn is_claimable(&self) -> bool {
        matches!(self, PurchasedPolicyStatus::Active)
    }
}

impl fmt::Display for PurchasedPolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PurchasedPolicyStatus {
    type Err = PartyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(PurchasedPolicyStatus::Active),
            "claimed" => Ok(PurchasedPolicyStatus::Claimed),
            "expired" => Ok(PurchasedPolicyStatus::Expired),
            "cancelled" => Ok(PurchasedPolicyStatus::Cancelled),
            other => Err(PartyError::Validation(format!(
                "unknown purchased policy status: {other}"
            ))),
        }
    }
}

/// A customer's instance of a policy definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedPolicy {
    /// The policy definition this purchase instantiates
    pub policy_id: PolicyId,
    /// Purchase date, the anchor for maturity arithmetic
    pub purchase_date: NaiveDate,
    /// Agent who sold the policy, if agent-mediated
    pub agent_id: Option<AgentId>,
    pub status: PurchasedPolicyStatus,
    /// Set when an open claim reserves this entry
    pub claimed_at: Option<DateTime<Utc>>,
}

impl PurchasedPolicy {
    /// Creates an active entry as of the purchase date
    pub fn new(policy_id: PolicyId, purchase_date: NaiveDate) -> Self {
        Self {
            policy_id,
            purchase_date,
            agent_id: None,
            status: PurchasedPolicyStatus::Active,
            claimed_at: None,
        }
    }

    pub fn with_agent(mut self, agent_id: AgentId) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    pub fn with_status(mut self, status: PurchasedPolicyStatus) -> Self {
        self.status = status;
        self
    }
}

/// A customer account holding purchased policies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Agent currently servicing this account
    pub assigned_agent_id: Option<AgentId>,
    /// Who registered the customer record, agent or admin
    pub created_by: Option<ActorId>,
    pub policies: Vec<PurchasedPolicy>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CustomerId::new_v7(),
            name: name.into(),
            email: None,
            phone: None,
            assigned_agent_id: None,
            created_by: None,
            policies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_assigned_agent(mut self, agent_id: AgentId) -> Self {
        self.assigned_agent_id = Some(agent_id);
        self
    }

    pub fn with_created_by(mut self, actor: ActorId) -> Self {
        self.created_by = Some(actor);
        self
    }

    pub fn with_policy(mut self, policy: PurchasedPolicy) -> Self {
        self.policies.push(policy);
        self
    }

    /// Finds the purchased entry for a policy definition, if held
    pub fn purchased_policy(&self, policy_id: PolicyId) -> Option<&PurchasedPolicy> {
        self.policies.iter().find(|p| p.policy_id == policy_id)
    }

    /// True when the agent is assigned to this account or registered it
    pub fn is_serviced_by(&self, agent_id: AgentId) -> bool {
        self.assigned_agent_id == Some(agent_id)
            || self.created_by == Some(ActorId::from(agent_id))
    }

    /// Reserves the purchased entry for a new claim.
    ///
    /// Flips `Active` to `Claimed` and stamps `claimed_at`. Fails when the
    /// entry is absent or not in a claimable status, leaving the aggregate
    /// untouched.
    pub fn reserve_policy(&mut self, policy_id: PolicyId) -> Result<(), PartyError> {
        let entry = self
            .policies
            .iter_mut()
            .find(|p| p.policy_id == policy_id)
            .ok_or(PartyError::PolicyNotHeld(policy_id))?;

        if !entry.status.is_claimable() {
            return Err(PartyError::PolicyNotClaimable {
                policy: policy_id,
                status: entry.status,
            });
        }

        entry.status = PurchasedPolicyStatus::Claimed;
        entry.claimed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Compensating action for a failed claim insert: puts a reserved entry
    /// back to `Active`.
    pub fn release_policy(&mut self, policy_id: PolicyId) -> Result<(), PartyError> {
        let entry = self
            .policies
            .iter_mut()
            .find(|p| p.policy_id == policy_id)
            .ok_or(PartyError::PolicyNotHeld(policy_id))?;

        if entry.status != PurchasedPolicyStatus::Claimed {
            return Err(PartyError::PolicyNotReserved(policy_id));
        }

        entry.status = PurchasedPolicyStatus::Active;
        entry.claimed_at = None;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn purchase_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    #[test]
    fn test_reserve_flips_active_to_claimed() {
        let policy_id = PolicyId::new();
        let mut customer =
            Customer::new("Asha Rao").with_policy(PurchasedPolicy::new(policy_id, purchase_date()));

        customer.reserve_policy(policy_id).unwrap();

        let entry = customer.purchased_policy(policy_id).unwrap();
        assert_eq!(entry.status, PurchasedPolicyStatus::Claimed);
        assert!(entry.claimed_at.is_some());
    }

    #[test]
    fn test_reserve_rejects_non_active_entry() {
        let policy_id = PolicyId::new();
        let mut customer = Customer::new("Asha Rao").with_policy(
            PurchasedPolicy::new(policy_id, purchase_date())
                .with_status(PurchasedPolicyStatus::Expired),
        );

        let err = customer.reserve_policy(policy_id).unwrap_err();
        assert!(matches!(
            err,
            PartyError::PolicyNotClaimable {
                status: PurchasedPolicyStatus::Expired,
                ..
            }
        ));
    }

    #[test]
    fn test_reserve_rejects_unheld_policy() {
        let mut customer = Customer::new("Asha Rao");
        let err = customer.reserve_policy(PolicyId::new()).unwrap_err();
        assert!(matches!(err, PartyError::PolicyNotHeld(_)));
    }

    #[test]
    fn test_double_reserve_fails() {
        let policy_id = PolicyId::new();
        let mut customer =
            Customer::new("Asha Rao").with_policy(PurchasedPolicy::new(policy_id, purchase_date()));

        customer.reserve_policy(policy_id).unwrap();
        assert!(customer.reserve_policy(policy_id).is_err());
    }

    #[test]
    fn test_release_restores_active() {
        let policy_id = PolicyId::new();
        let mut customer =
            Customer::new("Asha Rao").with_policy(PurchasedPolicy::new(policy_id, purchase_date()));

        customer.reserve_policy(policy_id).unwrap();
        customer.release_policy(policy_id).unwrap();

        let entry = customer.purchased_policy(policy_id).unwrap();
        assert_eq!(entry.status, PurchasedPolicyStatus::Active);
        assert!(entry.claimed_at.is_none());
    }

    #[test]
    fn test_release_requires_reserved_entry() {
        let policy_id = PolicyId::new();
        let mut customer =
            Customer::new("Asha Rao").with_policy(PurchasedPolicy::new(policy_id, purchase_date()));

        let err = customer.release_policy(policy_id).unwrap_err();
        assert!(matches!(err, PartyError::PolicyNotReserved(_)));
    }

    #[test]
    fn test_is_serviced_by_assigned_agent() {
        let agent = AgentId::new();
        let customer = Customer::new("Asha Rao").with_assigned_agent(agent);

        assert!(customer.is_serviced_by(agent));
        assert!(!customer.is_serviced_by(AgentId::new()));
    }

    #[test]
    fn test_is_serviced_by_creating_agent() {
        let agent = AgentId::new();
        let customer = Customer::new("Asha Rao").with_created_by(ActorId::from(agent));

        assert!(customer.is_serviced_by(agent));
    }

    #[test]
    fn test_admin_created_record_matches_no_agent() {
        let customer = Customer::new("Asha Rao").with_created_by(ActorId::new());
        assert!(!customer.is_serviced_by(AgentId::new()));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            PurchasedPolicyStatus::Active,
            PurchasedPolicyStatus::Claimed,
            PurchasedPolicyStatus::Expired,
            PurchasedPolicyStatus::Cancelled,
        ] {
            let parsed: PurchasedPolicyStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
