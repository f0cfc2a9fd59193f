//! Role-scoped access resolution
//!
//! Centralizes the ownership chain that decides who may see or mutate a
//! claim. Admins are unrestricted. Agents reach exactly the customers they
//! service, meaning accounts assigned to them or registered by them; both
//! relations live on the customer record, so agent checks load it. Customers
//! reach only claims on their own account.

use std::sync::Arc;

use core_kernel::{Actor, AgentId, CustomerId};
use domain_party::{Customer, CustomerStore};

use crate::claim::Claim;
use crate::error::ClaimError;

/// Claim mutations gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimAction {
    /// Admin only
    UpdateStatus,
    /// Admin or servicing agent
    AddNote,
    /// Admin, servicing agent, or the owning customer
    AttachDocument,
}

/// The set of customers visible to an actor when listing claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimScope {
    /// No restriction (admins)
    All,
    /// Claims belonging to any of these customer accounts (agents)
    Customers(Vec<CustomerId>),
    /// The actor's own claims (customers)
    Owner(CustomerId),
}

/// Resolves whether an actor may view or act on claims
pub struct AccessResolver {
    customers: Arc<dyn CustomerStore>,
}

impl AccessResolver {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self { customers }
    }

    /// Checks view access to a claim
    pub async fn ensure_can_view(&self, actor: &Actor, claim: &Claim) -> Result<(), ClaimError> {
        match actor {
            Actor::Admin(_) => Ok(()),
            Actor::Customer(id) => {
                if claim.customer_id == *id {
                    Ok(())
                } else {
                    Err(ClaimError::access_denied(
                        "claim belongs to another customer",
                    ))
                }
            }
            Actor::Agent(agent_id) => {
                self.ensure_agent_services(*agent_id, claim.customer_id)
                    .await
            }
        }
    }

    /// Checks whether the actor may perform a mutation on the claim
    pub async fn ensure_can_act(
        &self,
        actor: &Actor,
        claim: &Claim,
        action: ClaimAction,
    ) -> Result<(), ClaimError> {
        match action {
            ClaimAction::UpdateStatus => {
                if !actor.can_update_status() {
                    return Err(ClaimError::access_denied(
                        "only admins may update claim status",
                    ));
                }
            }
            ClaimAction::AddNote => {
                if !actor.can_author_notes() {
                    return Err(ClaimError::access_denied("customers may not add notes"));
                }
            }
            ClaimAction::AttachDocument => {}
        }
        self.ensure_can_view(actor, claim).await
    }

    /// Resolves the customer account a new claim targets.
    ///
    /// Customer actors are their own target; a supplied id naming a
    /// different account is denied. Admins and agents must name the
    /// customer explicitly (omission is a validation failure, never a
    /// default-to-self), the account must exist, and agents must service
    /// it.
    pub async fn resolve_target_customer(
        &self,
        actor: &Actor,
        supplied: Option<CustomerId>,
    ) -> Result<CustomerId, ClaimError> {
        match actor {
            Actor::Customer(own_id) => match supplied {
                Some(id) if id != *own_id => Err(ClaimError::access_denied(
                    "customers may only open claims for themselves",
                )),
                _ => Ok(*own_id),
            },
            Actor::Admin(_) => {
                let id = supplied
                    .ok_or_else(|| ClaimError::validation("customerId is required"))?;
                self.lookup_customer(id).await?;
                Ok(id)
            }
            Actor::Agent(agent_id) => {
                let id = supplied
                    .ok_or_else(|| ClaimError::validation("customerId is required"))?;
                let customer = self.lookup_customer(id).await?;
                if customer.is_serviced_by(*agent_id) {
                    Ok(id)
                } else {
                    Err(ClaimError::access_denied(
                        "customer is not serviced by this agent",
                    ))
                }
            }
        }
    }

    /// Builds the role scope for claim listings
    pub async fn list_scope(&self, actor: &Actor) -> Result<ClaimScope, ClaimError> {
        match actor {
            Actor::Admin(_) => Ok(ClaimScope::All),
            Actor::Customer(id) => Ok(ClaimScope::Owner(*id)),
            Actor::Agent(agent_id) => {
                let ids = self.customers.customer_ids_for_agent(*agent_id).await?;
                Ok(ClaimScope::Customers(ids))
            }
        }
    }

    async fn ensure_agent_services(
        &self,
        agent_id: AgentId,
        customer_id: CustomerId,
    ) -> Result<(), ClaimError> {
        let customer = match self.customers.get(customer_id).await {
            Ok(customer) => customer,
            // No customer record, no way to establish either relation.
            Err(err) if err.is_not_found() => {
                return Err(ClaimError::access_denied(
                    "claim belongs to a customer outside your book",
                ))
            }
            Err(err) => return Err(err.into()),
        };

        if customer.is_serviced_by(agent_id) {
            Ok(())
        } else {
            Err(ClaimError::access_denied(
                "claim belongs to a customer outside your book",
            ))
        }
    }

    async fn lookup_customer(&self, id: CustomerId) -> Result<Customer, ClaimError> {
        self.customers.get(id).await.map_err(ClaimError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::ClaimType;
    use chrono::NaiveDate;
    use core_kernel::{ActorId, Currency, Money, PolicyId};
    use domain_party::MockCustomerStore;
    use rust_decimal_macros::dec;

    fn claim_for(customer_id: CustomerId) -> Claim {
        Claim::open(
            "CLM-123456-001".to_string(),
            PolicyId::new(),
            customer_id,
            ClaimType::Accident,
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
            "Rear-ended at a junction".to_string(),
            Money::new(dec!(1200), Currency::USD),
            ActorId::new(),
        )
    }

    async fn resolver_with(customers: Vec<Customer>) -> AccessResolver {
        AccessResolver::new(Arc::new(MockCustomerStore::with_customers(customers).await))
    }

    #[tokio::test]
    async fn test_admin_views_any_claim() {
        let resolver = resolver_with(vec![]).await;
        let claim = claim_for(CustomerId::new());
        let admin = Actor::Admin(ActorId::new());

        assert!(resolver.ensure_can_view(&admin, &claim).await.is_ok());
    }

    #[tokio::test]
    async fn test_customer_views_only_own_claims() {
        let resolver = resolver_with(vec![]).await;
        let own = CustomerId::new();
        let actor = Actor::Customer(own);

        assert!(resolver
            .ensure_can_view(&actor, &claim_for(own))
            .await
            .is_ok());
        let err = resolver
            .ensure_can_view(&actor, &claim_for(CustomerId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_agent_needs_a_servicing_relation() {
        let agent_id = AgentId::new();
        let serviced = Customer::new("Serviced").with_assigned_agent(agent_id);
        let other = Customer::new("Other");
        let (serviced_id, other_id) = (serviced.id, other.id);
        let resolver = resolver_with(vec![serviced, other]).await;
        let actor = Actor::Agent(agent_id);

        assert!(resolver
            .ensure_can_view(&actor, &claim_for(serviced_id))
            .await
            .is_ok());
        let err = resolver
            .ensure_can_view(&actor, &claim_for(other_id))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_agent_denied_when_customer_record_missing() {
        let resolver = resolver_with(vec![]).await;
        let actor = Actor::Agent(AgentId::new());
        let err = resolver
            .ensure_can_view(&actor, &claim_for(CustomerId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_update_status_is_admin_only() {
        let agent_id = AgentId::new();
        let account = Customer::new("Asha Rao").with_assigned_agent(agent_id);
        let claim = claim_for(account.id);
        let resolver = resolver_with(vec![account]).await;

        let agent = Actor::Agent(agent_id);
        let err = resolver
            .ensure_can_act(&agent, &claim, ClaimAction::UpdateStatus)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::AccessDenied(_)));

        let admin = Actor::Admin(ActorId::new());
        assert!(resolver
            .ensure_can_act(&admin, &claim, ClaimAction::UpdateStatus)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_customers_cannot_author_notes_but_can_attach() {
        let own = CustomerId::new();
        let resolver = resolver_with(vec![]).await;
        let actor = Actor::Customer(own);
        let claim = claim_for(own);

        let err = resolver
            .ensure_can_act(&actor, &claim, ClaimAction::AddNote)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::AccessDenied(_)));

        assert!(resolver
            .ensure_can_act(&actor, &claim, ClaimAction::AttachDocument)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_resolve_target_defaults_customer_to_self() {
        let own = CustomerId::new();
        let resolver = resolver_with(vec![]).await;
        let actor = Actor::Customer(own);

        assert_eq!(
            resolver.resolve_target_customer(&actor, None).await.unwrap(),
            own
        );
        assert_eq!(
            resolver
                .resolve_target_customer(&actor, Some(own))
                .await
                .unwrap(),
            own
        );
    }

    #[tokio::test]
    async fn test_resolve_target_denies_customer_impersonation() {
        let resolver = resolver_with(vec![]).await;
        let actor = Actor::Customer(CustomerId::new());
        let err = resolver
            .resolve_target_customer(&actor, Some(CustomerId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_resolve_target_requires_explicit_id_for_admin() {
        let resolver = resolver_with(vec![]).await;
        let admin = Actor::Admin(ActorId::new());
        let err = resolver
            .resolve_target_customer(&admin, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::Validation(_)));
    }

    #[tokio::test]
    async fn test_resolve_target_checks_existence_for_admin() {
        let resolver = resolver_with(vec![]).await;
        let admin = Actor::Admin(ActorId::new());
        let err = resolver
            .resolve_target_customer(&admin, Some(CustomerId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_target_requires_agent_relation() {
        let agent_id = AgentId::new();
        let unrelated = Customer::new("Unrelated");
        let unrelated_id = unrelated.id;
        let resolver = resolver_with(vec![unrelated]).await;
        let actor = Actor::Agent(agent_id);

        let err = resolver
            .resolve_target_customer(&actor, Some(unrelated_id))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_list_scope_per_role() {
        let agent_id = AgentId::new();
        let mine = Customer::new("Mine").with_assigned_agent(agent_id);
        let mine_id = mine.id;
        let resolver = resolver_with(vec![mine, Customer::new("Other")]).await;

        assert_eq!(
            resolver
                .list_scope(&Actor::Admin(ActorId::new()))
                .await
                .unwrap(),
            ClaimScope::All
        );

        let own = CustomerId::new();
        assert_eq!(
            resolver.list_scope(&Actor::Customer(own)).await.unwrap(),
            ClaimScope::Owner(own)
        );

        match resolver.list_scope(&Actor::Agent(agent_id)).await.unwrap() {
            ClaimScope::Customers(ids) => assert_eq!(ids, vec![mine_id]),
            other => panic!("expected Customers scope, got {other:?}"),
        }
    }
}
