//! Claims DTOs
//!
//! Wire shapes for the claim endpoints. Request fields are optional across
//! the board; presence is validated by the claims service so that missing
//! input comes back as a `{success: false}` envelope instead of a serde
//! decode error. Responses are camelCase.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{Actor, CustomerId, PolicyId};
use domain_claims::{
    Claim, ClaimDetail, ClaimDocument, ClaimFilter, ClaimNote, ClaimStatus, ClaimType,
    DocumentAttachment, MaturitySettlement, OpenClaim, StatusChange, TimelineEntry,
};
use domain_policy::PolicyDefinition;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    pub policy_id: Option<Uuid>,
    /// Target customer; required for admin actors, defaulted for customers
    pub customer_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub claim_type: Option<String>,
    pub incident_date: Option<NaiveDate>,
    #[validate(length(max = 2000, message = "description is too long"))]
    pub description: Option<String>,
    pub requested_amount: Option<Decimal>,
}

impl CreateClaimRequest {
    /// Converts to the service command, parsing the claim type eagerly so
    /// an unknown kind fails before any store access
    pub fn into_open_claim(self) -> Result<OpenClaim, ApiError> {
        let claim_type = self
            .claim_type
            .as_deref()
            .map(ClaimType::from_str)
            .transpose()?;

        Ok(OpenClaim {
            policy_id: self.policy_id.map(PolicyId::from),
            customer_id: self.customer_id.map(CustomerId::from),
            claim_type,
            incident_date: self.incident_date,
            description: self.description,
            requested_amount: self.requested_amount,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
    #[validate(length(max = 2000, message = "note is too long"))]
    pub note: Option<String>,
    pub approved_amount: Option<Decimal>,
}

impl UpdateStatusRequest {
    pub fn into_status_change(self) -> Result<StatusChange, ApiError> {
        let status = self
            .status
            .as_deref()
            .ok_or_else(|| domain_claims::ClaimError::validation("status is required"))?;
        let status = ClaimStatus::from_str(status)?;

        Ok(StatusChange {
            status,
            note: self.note,
            approved_amount: self.approved_amount,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteRequest {
    #[validate(length(max = 2000, message = "note is too long"))]
    pub text: Option<String>,
    pub is_internal: Option<bool>,
}

/// Query-string filters for claim listings
#[derive(Debug, Default, Deserialize)]
pub struct ListClaimsQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub claim_type: Option<String>,
    pub search: Option<String>,
}

impl ListClaimsQuery {
    pub fn into_filter(self) -> Result<ClaimFilter, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(ClaimStatus::from_str)
            .transpose()?;
        let claim_type = self
            .claim_type
            .as_deref()
            .map(ClaimType::from_str)
            .transpose()?;

        Ok(ClaimFilter {
            status,
            claim_type,
            search: self.search,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntryResponse {
    pub status: String,
    pub actor: Uuid,
    pub at: DateTime<Utc>,
    pub note: String,
}

impl From<&TimelineEntry> for TimelineEntryResponse {
    fn from(entry: &TimelineEntry) -> Self {
        Self {
            status: entry.status.as_str().to_string(),
            actor: *entry.actor.as_uuid(),
            at: entry.at,
            note: entry.note.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub text: String,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
    pub is_internal: bool,
}

impl From<&ClaimNote> for NoteResponse {
    fn from(note: &ClaimNote) -> Self {
        Self {
            text: note.text.clone(),
            author: *note.author.as_uuid(),
            created_at: note.created_at,
            is_internal: note.is_internal,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&ClaimDocument> for DocumentResponse {
    fn from(document: &ClaimDocument) -> Self {
        Self {
            name: document.name.clone(),
            url: document.url.clone(),
            content_type: document.content_type.clone(),
            uploaded_at: document.uploaded_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaturityResponse {
    pub kind: String,
    pub policy_expiry_date: NaiveDate,
    pub payable_amount: Decimal,
}

impl From<&MaturitySettlement> for MaturityResponse {
    fn from(settlement: &MaturitySettlement) -> Self {
        Self {
            kind: settlement.kind.as_str().to_string(),
            policy_expiry_date: settlement.policy_expiry_date,
            payable_amount: settlement.payable_amount.amount(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: Uuid,
    pub claim_number: String,
    pub policy_id: Uuid,
    pub customer_id: Uuid,
    #[serde(rename = "type")]
    pub claim_type: String,
    pub status: String,
    pub incident_date: NaiveDate,
    pub description: String,
    pub requested_amount: Decimal,
    pub approved_amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity: Option<MaturityResponse>,
    pub timeline: Vec<TimelineEntryResponse>,
    pub notes: Vec<NoteResponse>,
    pub documents: Vec<DocumentResponse>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClaimResponse {
    /// Renders a claim for the requesting actor. Internal notes are
    /// stripped for customer actors.
    pub fn for_actor(actor: &Actor, claim: &Claim) -> Self {
        let include_internal = actor.can_author_notes();
        let notes = claim
            .notes
            .iter()
            .filter(|note| include_internal || !note.is_internal)
            .map(NoteResponse::from)
            .collect();

        Self {
            id: *claim.id.as_uuid(),
            claim_number: claim.claim_number.clone(),
            policy_id: *claim.policy_id.as_uuid(),
            customer_id: *claim.customer_id.as_uuid(),
            claim_type: claim.claim_type.as_str().to_string(),
            status: claim.status.as_str().to_string(),
            incident_date: claim.incident_date,
            description: claim.description.clone(),
            requested_amount: claim.requested_amount.amount(),
            approved_amount: claim.approved_amount.amount(),
            currency: claim.requested_amount.currency().code().to_string(),
            maturity: claim.maturity.as_ref().map(MaturityResponse::from),
            timeline: claim.timeline.iter().map(TimelineEntryResponse::from).collect(),
            notes,
            documents: claim.documents.iter().map(DocumentResponse::from).collect(),
            created_by: *claim.created_by.as_uuid(),
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}

/// Policy fields embedded in a claim detail
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySummaryResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub coverage_amount: Decimal,
    pub currency: String,
    pub tenure_value: u32,
    pub tenure_unit: String,
}

impl From<&PolicyDefinition> for PolicySummaryResponse {
    fn from(definition: &PolicyDefinition) -> Self {
        Self {
            id: *definition.id.as_uuid(),
            name: definition.name.clone(),
            description: definition.description.clone(),
            coverage_amount: definition.coverage_amount.amount(),
            currency: definition.coverage_amount.currency().code().to_string(),
            tenure_value: definition.tenure.value(),
            tenure_unit: definition.tenure.unit().as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummaryResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A claim with its policy and customer relations populated
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDetailResponse {
    #[serde(flatten)]
    pub claim: ClaimResponse,
    pub policy: Option<PolicySummaryResponse>,
    pub customer: Option<CustomerSummaryResponse>,
}

impl ClaimDetailResponse {
    pub fn for_actor(actor: &Actor, detail: &ClaimDetail) -> Self {
        Self {
            claim: ClaimResponse::for_actor(actor, &detail.claim),
            policy: detail.policy.as_ref().map(PolicySummaryResponse::from),
            customer: detail.customer.as_ref().map(|c| CustomerSummaryResponse {
                id: *c.id.as_uuid(),
                name: c.name.clone(),
                email: c.email.clone(),
            }),
        }
    }
}

/// Multipart metadata accompanying an uploaded document
#[derive(Debug, Default)]
pub struct DocumentUpload {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Option<Vec<u8>>,
}

impl DocumentUpload {
    /// The display name recorded on the claim: an explicit `name` field
    /// wins, then the uploaded file name
    pub fn document_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.file_name.clone())
            .unwrap_or_else(|| "document".to_string())
    }

    pub fn into_attachment(self, url: String) -> DocumentAttachment {
        DocumentAttachment {
            name: self.document_name(),
            url,
            content_type: self.content_type,
        }
    }
}
