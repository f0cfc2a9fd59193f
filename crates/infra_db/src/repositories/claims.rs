//! Claims repository
//!
//! Database access for the claims table. Scalar claim fields live in
//! typed columns; the timeline, notes, documents, and maturity payloads
//! are stored as JSONB and decoded by the adapter layer. The UNIQUE
//! constraint on `claim_number` arbitrates generator collisions: a
//! duplicate insert surfaces as `DatabaseError::DuplicateEntry`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for claim data
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a claim by its identifier
    ///
    /// # Returns
    ///
    /// The claim row or `DatabaseError::NotFound`
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimRow, DatabaseError> {
        sqlx::query_as::<_, ClaimRow>(
            r#"
            SELECT
                claim_id, claim_number, policy_id, customer_id,
                claim_type, status, incident_date, description,
                requested_amount, approved_amount, currency,
                maturity, timeline, notes, documents,
                created_by, created_at, updated_at
            FROM claims
            WHERE claim_id = $1
            "#,
        )
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?
        .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Inserts a new claim
    ///
    /// # Returns
    ///
    /// `DatabaseError::DuplicateEntry` when the claim number is taken
    pub async fn insert(&self, row: &ClaimRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO claims (
                claim_id, claim_number, policy_id, customer_id,
                claim_type, status, incident_date, description,
                requested_amount, approved_amount, currency,
                maturity, timeline, notes, documents,
                created_by, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9,
                $10, $11, $12, $13, $14, $15, $16, $17, $18
            )
            "#,
        )
        .bind(row.claim_id)
        .bind(&row.claim_number)
        .bind(row.policy_id)
        .bind(row.customer_id)
        .bind(&row.claim_type)
        .bind(&row.status)
        .bind(row.incident_date)
        .bind(&row.description)
        .bind(row.requested_amount)
        .bind(row.approved_amount)
        .bind(&row.currency)
        .bind(&row.maturity)
        .bind(&row.timeline)
        .bind(&row.notes)
        .bind(&row.documents)
        .bind(row.created_by)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(())
    }

    /// Lists claims matching the filters, newest first
    pub async fn find(&self, filters: &ClaimFilters) -> Result<Vec<ClaimRow>, DatabaseError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                claim_id, claim_number, policy_id, customer_id,
                claim_type, status, incident_date, description,
                requested_amount, approved_amount, currency,
                maturity, timeline, notes, documents,
                created_by, created_at, updated_at
            FROM claims
            WHERE 1 = 1
            "#,
        );

        if let Some(ids) = &filters.customer_ids {
            query.push(" AND customer_id = ANY(");
            query.push_bind(ids.clone());
            query.push(")");
        }
        if let Some(status) = &filters.status {
            query.push(" AND status = ");
            query.push_bind(status.clone());
        }
        if let Some(claim_type) = &filters.claim_type {
            query.push(" AND claim_type = ");
            query.push_bind(claim_type.clone());
        }
        if let Some(fragment) = &filters.number_fragment {
            query.push(" AND claim_number ILIKE ");
            query.push_bind(format!("%{}%", fragment));
        }
        query.push(" ORDER BY created_at DESC");

        query
            .build_query_as::<ClaimRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))
    }

    /// Persists the mutable fields of an existing claim
    ///
    /// # Returns
    ///
    /// `DatabaseError::NotFound` when no row matches the identifier
    pub async fn update(&self, row: &ClaimRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE claims
            SET status = $2, approved_amount = $3, maturity = $4,
                timeline = $5, notes = $6, documents = $7, updated_at = $8
            WHERE claim_id = $1
            "#,
        )
        .bind(row.claim_id)
        .bind(&row.status)
        .bind(row.approved_amount)
        .bind(&row.maturity)
        .bind(&row.timeline)
        .bind(&row.notes)
        .bind(&row.documents)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Claim", row.claim_id));
        }
        Ok(())
    }
}

/// Listing filters in raw column terms; the adapter maps the domain
/// query onto these
#[derive(Debug, Clone, Default)]
pub struct ClaimFilters {
    pub customer_ids: Option<Vec<Uuid>>,
    pub status: Option<String>,
    pub claim_type: Option<String>,
    pub number_fragment: Option<String>,
}

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub claim_number: String,
    pub policy_id: Uuid,
    pub customer_id: Uuid,
    pub claim_type: String,
    pub status: String,
    pub incident_date: NaiveDate,
    pub description: String,
    pub requested_amount: Decimal,
    pub approved_amount: Decimal,
    pub currency: String,
    pub maturity: Option<serde_json::Value>,
    pub timeline: serde_json::Value,
    pub notes: serde_json::Value,
    pub documents: serde_json::Value,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
