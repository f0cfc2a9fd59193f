//! PostgreSQL Claim Store Adapter
//!
//! Implements the `ClaimStore` port on top of the `ClaimsRepository`.
//! Scalar fields map to typed columns; timeline, notes, documents, and
//! the maturity payload pass through serde to JSONB and back.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{ClaimId, Currency, CustomerId, DomainPort, Money, PolicyId, PortError};
use domain_claims::{
    Claim, ClaimDocument, ClaimNote, ClaimQuery, ClaimStatus, ClaimStore, ClaimType,
    MaturitySettlement, TimelineEntry,
};

use crate::adapters::db_to_port_error;
use crate::repositories::claims::{ClaimFilters, ClaimRow, ClaimsRepository};

/// PostgreSQL-backed implementation of the ClaimStore port
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - missing rows -> `PortError::NotFound`
/// - claim-number unique violations -> `PortError::Conflict`
/// - undecodable JSONB payloads -> `PortError::Transformation`
#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimStore {
    /// Creates a new PostgreSQL claim store
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresClaimStore {}

#[async_trait]
impl ClaimStore for PostgresClaimStore {
    #[instrument(skip(self, claim), fields(claim_number = %claim.claim_number))]
    async fn insert(&self, claim: &Claim) -> Result<(), PortError> {
        debug!("inserting claim");

        let row = claim_to_row(claim)?;
        self.repository.insert(&row).await.map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get(&self, id: ClaimId) -> Result<Claim, PortError> {
        debug!("fetching claim by id");

        let row = self
            .repository
            .get_by_id(id.into())
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    PortError::not_found("Claim", id)
                } else {
                    db_to_port_error(e)
                }
            })?;

        row_to_claim(row)
    }

    #[instrument(skip(self, query))]
    async fn find(&self, query: &ClaimQuery) -> Result<Vec<Claim>, PortError> {
        debug!("listing claims");

        // An empty customer scope can match nothing; skip the round trip.
        if matches!(&query.customer_ids, Some(ids) if ids.is_empty()) {
            return Ok(Vec::new());
        }

        let rows = self
            .repository
            .find(&query_to_filters(query))
            .await
            .map_err(db_to_port_error)?;

        rows.into_iter().map(row_to_claim).collect()
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn save(&self, claim: &Claim) -> Result<(), PortError> {
        debug!("saving claim");

        let row = claim_to_row(claim)?;
        self.repository.update(&row).await.map_err(|e| {
            if e.is_not_found() {
                PortError::not_found("Claim", claim.id)
            } else {
                db_to_port_error(e)
            }
        })
    }

    async fn ping(&self) -> Result<(), PortError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::connection(e.to_string()))?;
        Ok(())
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

/// Maps the domain query onto raw column filters
fn query_to_filters(query: &ClaimQuery) -> ClaimFilters {
    ClaimFilters {
        customer_ids: query
            .customer_ids
            .as_ref()
            .map(|ids| ids.iter().map(|id| *id.as_uuid()).collect()),
        status: query.status.map(|s| s.as_str().to_string()),
        claim_type: query.claim_type.map(|t| t.as_str().to_string()),
        number_fragment: query.number_contains.clone(),
    }
}

fn claim_to_row(claim: &Claim) -> Result<ClaimRow, PortError> {
    let maturity = claim
        .maturity
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| PortError::transformation(format!("maturity payload: {e}")))?;

    Ok(ClaimRow {
        claim_id: claim.id.into(),
        claim_number: claim.claim_number.clone(),
        policy_id: claim.policy_id.into(),
        customer_id: claim.customer_id.into(),
        claim_type: claim.claim_type.as_str().to_string(),
        status: claim.status.as_str().to_string(),
        incident_date: claim.incident_date,
        description: claim.description.clone(),
        requested_amount: claim.requested_amount.amount(),
        approved_amount: claim.approved_amount.amount(),
        currency: claim.requested_amount.currency().code().to_string(),
        maturity,
        timeline: to_json("timeline", &claim.timeline)?,
        notes: to_json("notes", &claim.notes)?,
        documents: to_json("documents", &claim.documents)?,
        created_by: claim.created_by.into(),
        created_at: claim.created_at,
        updated_at: claim.updated_at,
    })
}

fn row_to_claim(row: ClaimRow) -> Result<Claim, PortError> {
    let currency = Currency::from_str(&row.currency)
        .map_err(|e| PortError::transformation(e.to_string()))?;
    let status = ClaimStatus::from_str(&row.status)
        .map_err(|e| PortError::transformation(e.to_string()))?;
    let claim_type = ClaimType::from_str(&row.claim_type)
        .map_err(|e| PortError::transformation(e.to_string()))?;

    let maturity: Option<MaturitySettlement> = row
        .maturity
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| PortError::transformation(format!("maturity payload: {e}")))?;
    let timeline: Vec<TimelineEntry> = from_json("timeline", row.timeline)?;
    let notes: Vec<ClaimNote> = from_json("notes", row.notes)?;
    let documents: Vec<ClaimDocument> = from_json("documents", row.documents)?;

    Ok(Claim {
        id: ClaimId::from(row.claim_id),
        claim_number: row.claim_number,
        policy_id: PolicyId::from(row.policy_id),
        customer_id: CustomerId::from(row.customer_id),
        claim_type,
        status,
        incident_date: row.incident_date,
        description: row.description,
        requested_amount: Money::new(row.requested_amount, currency),
        approved_amount: Money::new(row.approved_amount, currency),
        maturity,
        timeline,
        notes,
        documents,
        created_by: row.created_by.into(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn to_json<T: serde::Serialize>(context: &str, value: &T) -> Result<serde_json::Value, PortError> {
    serde_json::to_value(value)
        .map_err(|e| PortError::transformation(format!("{context} payload: {e}")))
}

fn from_json<T: serde::de::DeserializeOwned>(
    context: &str,
    value: serde_json::Value,
) -> Result<T, PortError> {
    serde_json::from_value(value)
        .map_err(|e| PortError::transformation(format!("{context} payload: {e}")))
}
