//! Claim persistence port
//!
//! [`ClaimStore`] is the storage seam for claims. Claim-number uniqueness
//! is the adapter's responsibility: `insert` reports a duplicate as
//! `Conflict` so the caller can regenerate the number and retry.

use async_trait::async_trait;

use core_kernel::{ClaimId, CustomerId, DomainPort, PortError};

use crate::claim::{Claim, ClaimStatus, ClaimType};

/// Filter for claim listings
///
/// Builder-style; unset fields do not constrain the result. The customer
/// filter carries the role scope: `None` means unrestricted, an empty list
/// matches nothing.
#[derive(Debug, Clone, Default)]
pub struct ClaimQuery {
    pub customer_ids: Option<Vec<CustomerId>>,
    pub status: Option<ClaimStatus>,
    pub claim_type: Option<ClaimType>,
    pub number_contains: Option<String>,
}

impl ClaimQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_customers(mut self, ids: Vec<CustomerId>) -> Self {
        self.customer_ids = Some(ids);
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_claim_type(mut self, claim_type: ClaimType) -> Self {
        self.claim_type = Some(claim_type);
        self
    }

    /// Case-insensitive substring match on the claim number
    pub fn with_number_contains(mut self, fragment: impl Into<String>) -> Self {
        self.number_contains = Some(fragment.into());
        self
    }

    /// True when the claim passes every set filter
    pub fn matches(&self, claim: &Claim) -> bool {
        if let Some(ids) = &self.customer_ids {
            if !ids.contains(&claim.customer_id) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if claim.status != status {
                return false;
            }
        }
        if let Some(claim_type) = self.claim_type {
            if claim.claim_type != claim_type {
                return false;
            }
        }
        if let Some(fragment) = &self.number_contains {
            let haystack = claim.claim_number.to_ascii_lowercase();
            if !haystack.contains(&fragment.to_ascii_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Port for claim persistence
#[async_trait]
pub trait ClaimStore: DomainPort {
    /// Inserts a new claim.
    ///
    /// Returns `Conflict` when the claim number is already taken.
    async fn insert(&self, claim: &Claim) -> Result<(), PortError>;

    /// Fetches a claim by id
    async fn get(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Lists claims matching the query, newest first
    async fn find(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError>;

    /// Persists the current state of an existing claim
    async fn save(&self, claim: &Claim) -> Result<(), PortError>;

    /// Probes the backing store
    async fn ping(&self) -> Result<(), PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! In-memory mock for tests and local development

    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use super::*;

    /// In-memory [`ClaimStore`] backed by a `HashMap`.
    ///
    /// Errors can be queued with [`fail_next_insert`] to exercise the
    /// caller's conflict-retry and rollback paths.
    ///
    /// [`fail_next_insert`]: MockClaimStore::fail_next_insert
    #[derive(Debug, Clone, Default)]
    pub struct MockClaimStore {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
        insert_failures: Arc<RwLock<VecDeque<PortError>>>,
    }

    impl MockClaimStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues an error returned by the next `insert` call
        pub async fn fail_next_insert(&self, error: PortError) {
            self.insert_failures.write().await.push_back(error);
        }

        /// Number of stored claims
        pub async fn len(&self) -> usize {
            self.claims.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.claims.read().await.is_empty()
        }
    }

    impl DomainPort for MockClaimStore {}

    #[async_trait]
    impl ClaimStore for MockClaimStore {
        async fn insert(&self, claim: &Claim) -> Result<(), PortError> {
            if let Some(error) = self.insert_failures.write().await.pop_front() {
                return Err(error);
            }

            let mut guard = self.claims.write().await;
            if guard
                .values()
                .any(|existing| existing.claim_number == claim.claim_number)
            {
                return Err(PortError::conflict(format!(
                    "claim number {} already exists",
                    claim.claim_number
                )));
            }
            guard.insert(claim.id, claim.clone());
            Ok(())
        }

        async fn get(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn find(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError> {
            let guard = self.claims.read().await;
            let mut matching: Vec<Claim> = guard
                .values()
                .filter(|claim| query.matches(claim))
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(matching)
        }

        async fn save(&self, claim: &Claim) -> Result<(), PortError> {
            let mut guard = self.claims.write().await;
            if !guard.contains_key(&claim.id) {
                return Err(PortError::not_found("Claim", claim.id));
            }
            guard.insert(claim.id, claim.clone());
            Ok(())
        }

        async fn ping(&self) -> Result<(), PortError> {
            Ok(())
        }
    }
}
