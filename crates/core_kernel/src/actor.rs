//! The authenticated actor performing an operation
//!
//! Every inbound request carries an actor resolved from its auth token.
//! Instead of branching on a role string at each call site, `Actor` is a
//! tagged enum carrying the typed identifier for its role, with capability
//! queries for the rules that depend on role alone. Ownership rules that
//! need the customer record live in the claims access resolver.

use crate::identifiers::{ActorId, AgentId, CustomerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Role names as they appear in auth tokens and audit logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "agent" => Ok(Role::Agent),
            "customer" => Ok(Role::Customer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// An authenticated identity: role plus the typed id for that role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Actor {
    Admin(ActorId),
    Agent(AgentId),
    Customer(CustomerId),
}

impl Actor {
    /// Builds an actor from the raw parts carried by an auth token
    pub fn from_parts(role: Role, id: Uuid) -> Self {
        match role {
            Role::Admin => Actor::Admin(ActorId::from_uuid(id)),
            Role::Agent => Actor::Agent(AgentId::from_uuid(id)),
            Role::Customer => Actor::Customer(CustomerId::from_uuid(id)),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Actor::Admin(_) => Role::Admin,
            Actor::Agent(_) => Role::Agent,
            Actor::Customer(_) => Role::Customer,
        }
    }

    /// The role-agnostic reference recorded in timelines, notes and
    /// created-by fields
    pub fn actor_id(&self) -> ActorId {
        match self {
            Actor::Admin(id) => *id,
            Actor::Agent(id) => ActorId::from(*id),
            Actor::Customer(id) => ActorId::from(*id),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin(_))
    }

    /// Status transitions are reserved for admins
    pub fn can_update_status(&self) -> bool {
        self.is_admin()
    }

    /// Notes are staff-authored; customers never write them
    pub fn can_author_notes(&self) -> bool {
        matches!(self, Actor::Admin(_) | Actor::Agent(_))
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Admin(id) => write!(f, "admin:{}", id),
            Actor::Agent(id) => write!(f, "agent:{}", id),
            Actor::Customer(id) => write!(f, "customer:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Agent, Role::Customer] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_capabilities_by_role() {
        let admin = Actor::Admin(ActorId::new());
        let agent = Actor::Agent(AgentId::new());
        let customer = Actor::Customer(CustomerId::new());

        assert!(admin.can_update_status());
        assert!(!agent.can_update_status());
        assert!(!customer.can_update_status());

        assert!(admin.can_author_notes());
        assert!(agent.can_author_notes());
        assert!(!customer.can_author_notes());
    }

    #[test]
    fn test_actor_id_is_role_agnostic() {
        let uuid = Uuid::new_v4();
        let as_agent = Actor::from_parts(Role::Agent, uuid);
        let as_customer = Actor::from_parts(Role::Customer, uuid);

        assert_eq!(as_agent.actor_id(), as_customer.actor_id());
        assert_eq!(*as_agent.actor_id().as_uuid(), uuid);
    }

    #[test]
    fn test_actor_serde_shape() {
        let actor = Actor::Agent(AgentId::new());
        let json = serde_json::to_value(&actor).unwrap();

        assert_eq!(json["role"], "agent");
        assert!(json["id"].is_string());

        let back: Actor = serde_json::from_value(json).unwrap();
        assert_eq!(back, actor);
    }
}
