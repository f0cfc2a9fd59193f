//! Test Data Builders
//!
//! Provides builder patterns for constructing domain entities with
//! sensible defaults. These builders allow tests to specify only the
//! relevant fields while using defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{ActorId, AgentId, CustomerId, Money, PolicyId};
use domain_claims::{Claim, ClaimStatus, ClaimType};
use domain_party::{Customer, PurchasedPolicy};
use domain_policy::{PolicyDefinition, Tenure};

use crate::fixtures::{DateFixtures, IdFixtures, MoneyFixtures, StringFixtures};

/// Builder for policy definitions
pub struct PolicyDefinitionBuilder {
    id: Option<PolicyId>,
    name: String,
    description: Option<String>,
    coverage_amount: Money,
    tenure: Tenure,
    is_active: bool,
}

impl Default for PolicyDefinitionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyDefinitionBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: None,
            name: StringFixtures::policy_name().to_string(),
            description: None,
            coverage_amount: MoneyFixtures::usd_coverage(),
            tenure: Tenure::years(1).expect("one year is a valid tenure"),
            is_active: true,
        }
    }

    /// Pins the policy ID instead of generating one
    pub fn with_id(mut self, id: PolicyId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the policy name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the coverage amount
    pub fn with_coverage(mut self, coverage: Money) -> Self {
        self.coverage_amount = coverage;
        self
    }

    /// Sets the tenure
    pub fn with_tenure(mut self, tenure: Tenure) -> Self {
        self.tenure = tenure;
        self
    }

    /// Marks the definition as retired
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Builds the policy definition
    pub fn build(self) -> PolicyDefinition {
        let mut definition = PolicyDefinition::new(self.name, self.coverage_amount, self.tenure)
            .expect("builder defaults produce a valid definition");
        definition.description = self.description;
        definition.is_active = self.is_active;
        if let Some(id) = self.id {
            definition.id = id;
        }
        definition
    }
}

/// Builder for customer accounts
pub struct CustomerBuilder {
    id: Option<CustomerId>,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    assigned_agent: Option<AgentId>,
    created_by: Option<ActorId>,
    policies: Vec<PurchasedPolicy>,
}

impl Default for CustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: None,
            name: StringFixtures::customer_name().to_string(),
            email: Some(StringFixtures::email().to_string()),
            phone: None,
            assigned_agent: None,
            created_by: None,
            policies: Vec::new(),
        }
    }

    /// Pins the customer ID instead of generating one
    pub fn with_id(mut self, id: CustomerId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the customer name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Assigns a servicing agent
    pub fn with_assigned_agent(mut self, agent_id: AgentId) -> Self {
        self.assigned_agent = Some(agent_id);
        self
    }

    /// Records the actor who registered the account
    pub fn with_created_by(mut self, actor: ActorId) -> Self {
        self.created_by = Some(actor);
        self
    }

    /// Adds an active purchased policy with the standard purchase date
    pub fn holding(mut self, policy_id: PolicyId) -> Self {
        self.policies
            .push(PurchasedPolicy::new(policy_id, DateFixtures::purchase_date()));
        self
    }

    /// Adds a fully specified purchased-policy entry
    pub fn with_purchase(mut self, entry: PurchasedPolicy) -> Self {
        self.policies.push(entry);
        self
    }

    /// Builds the customer
    pub fn build(self) -> Customer {
        let mut customer = Customer::new(self.name);
        if let Some(email) = self.email {
            customer = customer.with_email(email);
        }
        if let Some(agent_id) = self.assigned_agent {
            customer = customer.with_assigned_agent(agent_id);
        }
        if let Some(actor) = self.created_by {
            customer = customer.with_created_by(actor);
        }
        for entry in self.policies {
            customer = customer.with_policy(entry);
        }
        customer.phone = self.phone;
        if let Some(id) = self.id {
            customer.id = id;
        }
        customer
    }
}

/// Builder for claims
pub struct ClaimBuilder {
    claim_number: String,
    policy_id: PolicyId,
    customer_id: CustomerId,
    claim_type: ClaimType,
    incident_date: NaiveDate,
    description: String,
    requested_amount: Money,
    created_by: ActorId,
    status: Option<ClaimStatus>,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            claim_number: StringFixtures::claim_number().to_string(),
            policy_id: IdFixtures::policy_id(),
            customer_id: IdFixtures::customer_id(),
            claim_type: ClaimType::Theft,
            incident_date: DateFixtures::incident_date(),
            description: StringFixtures::description().to_string(),
            requested_amount: MoneyFixtures::usd_requested(),
            created_by: IdFixtures::customer_id().into(),
            status: None,
        }
    }

    /// Sets the claim number
    pub fn with_claim_number(mut self, number: impl Into<String>) -> Self {
        self.claim_number = number.into();
        self
    }

    /// Sets the policy the claim is raised against
    pub fn for_policy(mut self, id: PolicyId) -> Self {
        self.policy_id = id;
        self
    }

    /// Sets the owning customer
    pub fn for_customer(mut self, id: CustomerId) -> Self {
        self.customer_id = id;
        self
    }

    /// Sets the claim type
    pub fn with_type(mut self, claim_type: ClaimType) -> Self {
        self.claim_type = claim_type;
        self
    }

    /// Sets the incident date
    pub fn with_incident_date(mut self, date: NaiveDate) -> Self {
        self.incident_date = date;
        self
    }

    /// Sets the incident description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the requested amount
    pub fn with_requested_amount(mut self, amount: Money) -> Self {
        self.requested_amount = amount;
        self
    }

    /// Sets the creating actor
    pub fn with_created_by(mut self, actor: ActorId) -> Self {
        self.created_by = actor;
        self
    }

    /// Moves the claim to a status after opening; appends the usual
    /// timeline entry
    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Builds the claim
    pub fn build(self) -> Claim {
        let mut claim = Claim::open(
            self.claim_number,
            self.policy_id,
            self.customer_id,
            self.claim_type,
            self.incident_date,
            self.description,
            self.requested_amount,
            self.created_by,
        );
        if let Some(status) = self.status {
            claim.record_status(status, self.created_by, None);
        }
        claim
    }
}
