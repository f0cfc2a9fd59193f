//! Claim lifecycle orchestration
//!
//! [`ClaimService`] drives every claim operation: creation against an
//! active purchased policy, admin status changes, note and document
//! attachment, and role-scoped listing. It owns no business math itself;
//! proration lives in [`crate::maturity`], access rules in
//! [`crate::access`], and persistence behind the store ports.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use core_kernel::{Actor, ClaimId, CustomerId, Money, PolicyId};
use domain_party::{Customer, CustomerStore, PurchasedPolicyStatus};
use domain_policy::{PolicyDefinition, PolicyStore};

use crate::access::{AccessResolver, ClaimAction, ClaimScope};
use crate::claim::{Claim, ClaimStatus, ClaimType};
use crate::claim_number;
use crate::error::ClaimError;
use crate::maturity;
use crate::ports::{ClaimQuery, ClaimStore};

/// Attempts at allocating a unique claim number before giving up
const CLAIM_NUMBER_ATTEMPTS: usize = 3;

/// Request to open a claim.
///
/// Fields arrive optional from the transport layer; presence is validated
/// here so missing input surfaces as a validation failure rather than a
/// decode error.
#[derive(Debug, Clone, Default)]
pub struct OpenClaim {
    pub policy_id: Option<PolicyId>,
    /// Required for admin and agent actors; customers are their own target
    pub customer_id: Option<CustomerId>,
    pub claim_type: Option<ClaimType>,
    pub incident_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub requested_amount: Option<Decimal>,
}

/// Admin status change
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status: ClaimStatus,
    /// Timeline note; defaults to "Status updated to <status>"
    pub note: Option<String>,
    pub approved_amount: Option<Decimal>,
}

/// Reference to a document already placed with the storage collaborator
#[derive(Debug, Clone)]
pub struct DocumentAttachment {
    pub name: String,
    pub url: String,
    pub content_type: Option<String>,
}

/// Optional narrowing filters for claim listings; role scoping is applied
/// separately and cannot be widened from here
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    pub status: Option<ClaimStatus>,
    pub claim_type: Option<ClaimType>,
    /// Free-text match on the claim number
    pub search: Option<String>,
}

/// Customer fields embedded in a claim detail
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
}

impl From<&Customer> for CustomerSummary {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
        }
    }
}

/// A claim with its relations populated.
///
/// A dangling policy or customer reference leaves the relation `None`
/// rather than failing the read.
#[derive(Debug, Clone)]
pub struct ClaimDetail {
    pub claim: Claim,
    pub policy: Option<PolicyDefinition>,
    pub customer: Option<CustomerSummary>,
}

/// Orchestrates the claim lifecycle
pub struct ClaimService {
    claims: Arc<dyn ClaimStore>,
    customers: Arc<dyn CustomerStore>,
    policies: Arc<dyn PolicyStore>,
    access: AccessResolver,
}

impl ClaimService {
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        customers: Arc<dyn CustomerStore>,
        policies: Arc<dyn PolicyStore>,
    ) -> Self {
        let access = AccessResolver::new(customers.clone());
        Self {
            claims,
            customers,
            policies,
            access,
        }
    }

    /// Opens a claim against a purchased policy.
    ///
    /// This method:
    /// 1. Validates the request fields
    /// 2. Resolves the target customer for the actor
    /// 3. Checks the customer holds the policy and the entry is active
    /// 4. Loads the policy definition
    /// 5. Computes maturity figures for maturity claims and enforces the
    ///    requested-amount tolerance
    /// 6. Reserves the purchased-policy entry (active to claimed)
    /// 7. Persists the claim, regenerating the claim number on conflict
    ///
    /// The reservation comes before the insert so two submissions racing
    /// for the same entry resolve to one winner; if the insert then fails,
    /// the reservation is released before the error surfaces.
    pub async fn open_claim(&self, actor: &Actor, request: OpenClaim) -> Result<Claim, ClaimError> {
        let policy_id = request
            .policy_id
            .ok_or_else(|| ClaimError::validation("policyId is required"))?;
        let claim_type = request
            .claim_type
            .ok_or_else(|| ClaimError::validation("type is required"))?;
        let incident_date = request
            .incident_date
            .ok_or_else(|| ClaimError::validation("incidentDate is required"))?;
        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ClaimError::validation("description is required"))?;
        let requested = request
            .requested_amount
            .ok_or_else(|| ClaimError::validation("requestedAmount is required"))?;
        if requested < Decimal::ZERO {
            return Err(ClaimError::validation("requestedAmount must not be negative"));
        }

        let customer_id = self
            .access
            .resolve_target_customer(actor, request.customer_id)
            .await?;

        let customer = self.customers.get(customer_id).await?;
        let entry = customer
            .purchased_policy(policy_id)
            .ok_or_else(|| ClaimError::not_found("policy not owned by customer"))?;
        if entry.status != PurchasedPolicyStatus::Active {
            return Err(ClaimError::invalid_state(format!(
                "policy is {}",
                entry.status
            )));
        }
        let purchase_date = entry.purchase_date;

        let definition = self.policies.get_definition(policy_id).await?;
        let requested_amount = Money::new(requested, definition.coverage_amount.currency());

        let mut claim = Claim::open(
            claim_number::generate(),
            policy_id,
            customer_id,
            claim_type,
            incident_date,
            description,
            requested_amount,
            actor.actor_id(),
        );

        if claim_type == ClaimType::Maturity {
            let settlement = maturity::evaluate(
                purchase_date,
                definition.tenure,
                &definition.coverage_amount,
                incident_date,
            );
            // One whole currency unit of slack absorbs rounding on the
            // requesting side.
            if requested_amount.amount() > settlement.payable_amount.amount() + Decimal::ONE {
                return Err(ClaimError::invalid_state(format!(
                    "requested amount {requested_amount} exceeds eligible maturity amount {}",
                    settlement.payable_amount
                )));
            }
            claim = claim.with_maturity(settlement);
        }

        self.customers.reserve_policy(customer_id, policy_id).await?;
        self.persist_reserved_claim(claim, customer_id, policy_id)
            .await
    }

    /// Applies an admin status change with its audit entry.
    ///
    /// Any status may move to any other; a transition out of Settled,
    /// Closed, or Rejected is permitted but logged at WARN.
    pub async fn update_status(
        &self,
        actor: &Actor,
        claim_id: ClaimId,
        change: StatusChange,
    ) -> Result<Claim, ClaimError> {
        if !actor.can_update_status() {
            return Err(ClaimError::access_denied(
                "only admins may update claim status",
            ));
        }
        if let Some(amount) = change.approved_amount {
            if amount < Decimal::ZERO {
                return Err(ClaimError::validation("approvedAmount must not be negative"));
            }
        }

        let mut claim = self.claims.get(claim_id).await?;

        if claim.status.is_terminal() && change.status != claim.status {
            warn!(
                claim_number = %claim.claim_number,
                from = %claim.status,
                to = %change.status,
                "transition out of a terminal status"
            );
        }

        if let Some(amount) = change.approved_amount {
            claim.approved_amount = Money::new(amount, claim.requested_amount.currency());
        }
        claim.record_status(change.status, actor.actor_id(), change.note);

        self.claims.save(&claim).await?;
        Ok(claim)
    }

    /// Appends a note; agents and admins only
    pub async fn add_note(
        &self,
        actor: &Actor,
        claim_id: ClaimId,
        text: String,
        is_internal: bool,
    ) -> Result<Claim, ClaimError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ClaimError::validation("note text is required"));
        }

        let mut claim = self.claims.get(claim_id).await?;
        self.access
            .ensure_can_act(actor, &claim, ClaimAction::AddNote)
            .await?;

        claim.add_note(text, actor.actor_id(), is_internal);
        self.claims.save(&claim).await?;
        Ok(claim)
    }

    /// Appends a stored-document reference.
    ///
    /// The `url` comes from the document-storage collaborator and is stored
    /// verbatim; this service never touches file bytes.
    pub async fn attach_document(
        &self,
        actor: &Actor,
        claim_id: ClaimId,
        attachment: DocumentAttachment,
    ) -> Result<Claim, ClaimError> {
        let name = attachment.name.trim().to_string();
        if name.is_empty() {
            return Err(ClaimError::validation("document name is required"));
        }
        if attachment.url.trim().is_empty() {
            return Err(ClaimError::validation("document reference is required"));
        }

        let mut claim = self.claims.get(claim_id).await?;
        self.access
            .ensure_can_act(actor, &claim, ClaimAction::AttachDocument)
            .await?;

        claim.attach_document(name, attachment.url, attachment.content_type);
        self.claims.save(&claim).await?;
        Ok(claim)
    }

    /// Lists claims visible to the actor, newest first
    pub async fn list_claims(
        &self,
        actor: &Actor,
        filter: ClaimFilter,
    ) -> Result<Vec<Claim>, ClaimError> {
        let mut query = match self.access.list_scope(actor).await? {
            ClaimScope::All => ClaimQuery::new(),
            ClaimScope::Customers(ids) => ClaimQuery::new().for_customers(ids),
            ClaimScope::Owner(id) => ClaimQuery::new().for_customers(vec![id]),
        };

        if let Some(status) = filter.status {
            query = query.with_status(status);
        }
        if let Some(claim_type) = filter.claim_type {
            query = query.with_claim_type(claim_type);
        }
        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            query = query.with_number_contains(search.trim().to_string());
        }

        Ok(self.claims.find(&query).await?)
    }

    /// Fetches one claim with its policy and customer relations populated
    pub async fn get_claim(
        &self,
        actor: &Actor,
        claim_id: ClaimId,
    ) -> Result<ClaimDetail, ClaimError> {
        let claim = self.claims.get(claim_id).await?;
        self.access.ensure_can_view(actor, &claim).await?;

        let policy = match self.policies.get_definition(claim.policy_id).await {
            Ok(definition) => Some(definition),
            Err(err) if err.is_not_found() => None,
            Err(err) => return Err(err.into()),
        };
        let customer = match self.customers.get(claim.customer_id).await {
            Ok(customer) => Some(CustomerSummary::from(&customer)),
            Err(err) if err.is_not_found() => None,
            Err(err) => return Err(err.into()),
        };

        Ok(ClaimDetail {
            claim,
            policy,
            customer,
        })
    }

    /// Probes every backing store; used by readiness checks
    pub async fn ping_stores(&self) -> Result<(), ClaimError> {
        self.claims.ping().await?;
        self.customers.ping().await?;
        self.policies.ping().await?;
        Ok(())
    }

    /// Inserts a claim whose purchased policy is already reserved,
    /// regenerating the claim number on storage conflicts. Any failure
    /// releases the reservation before the error is returned.
    async fn persist_reserved_claim(
        &self,
        mut claim: Claim,
        customer_id: CustomerId,
        policy_id: PolicyId,
    ) -> Result<Claim, ClaimError> {
        for attempt in 1..=CLAIM_NUMBER_ATTEMPTS {
            if attempt > 1 {
                claim = claim.with_claim_number(claim_number::generate());
            }
            match self.claims.insert(&claim).await {
                Ok(()) => return Ok(claim),
                Err(err) if err.is_conflict() => {
                    warn!(
                        claim_number = %claim.claim_number,
                        attempt,
                        "claim number collision, regenerating"
                    );
                }
                Err(err) => {
                    self.release_reservation(customer_id, policy_id).await;
                    return Err(err.into());
                }
            }
        }

        self.release_reservation(customer_id, policy_id).await;
        Err(ClaimError::unavailable(
            "could not allocate a unique claim number",
        ))
    }

    /// Compensating release after a failed insert; a failed release is
    /// logged and never masks the original error
    async fn release_reservation(&self, customer_id: CustomerId, policy_id: PolicyId) {
        if let Err(err) = self.customers.release_policy(customer_id, policy_id).await {
            warn!(
                %customer_id,
                %policy_id,
                error = %err,
                "failed to release purchased-policy reservation"
            );
        }
    }
}
