//! Claim aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ActorId, ClaimId, CustomerId, Money, PolicyId};

use crate::error::ClaimError;
use crate::maturity::MaturitySettlement;

/// Claim status
///
/// `Submitted` is the only state a claim is born in; every other state is
/// reached through an explicit admin transition, each of which appends a
/// timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    Draft,
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Info Required")]
    InfoRequired,
    Approved,
    Rejected,
    Settled,
    Closed,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Draft => "Draft",
            ClaimStatus::Submitted => "Submitted",
            ClaimStatus::UnderReview => "Under Review",
            ClaimStatus::InfoRequired => "Info Required",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
            ClaimStatus::Settled => "Settled",
            ClaimStatus::Closed => "Closed",
        }
    }

    /// Terminal by convention; transitions out are permitted but flagged
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Settled | ClaimStatus::Closed | ClaimStatus::Rejected
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => Ok(ClaimStatus::Draft),
            "submitted" => Ok(ClaimStatus::Submitted),
            "underreview" => Ok(ClaimStatus::UnderReview),
            "inforequired" => Ok(ClaimStatus::InfoRequired),
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            "settled" => Ok(ClaimStatus::Settled),
            "closed" => Ok(ClaimStatus::Closed),
            _ => Err(ClaimError::validation(format!("unknown claim status: {s}"))),
        }
    }
}

/// Kind of event the claim is raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimType {
    Theft,
    Accident,
    Medical,
    Death,
    Fire,
    Maturity,
    Other,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Theft => "Theft",
            ClaimType::Accident => "Accident",
            ClaimType::Medical => "Medical",
            ClaimType::Death => "Death",
            ClaimType::Fire => "Fire",
            ClaimType::Maturity => "Maturity",
            ClaimType::Other => "Other",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClaimType {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "theft" => Ok(ClaimType::Theft),
            "accident" => Ok(ClaimType::Accident),
            "medical" => Ok(ClaimType::Medical),
            "death" => Ok(ClaimType::Death),
            "fire" => Ok(ClaimType::Fire),
            "maturity" => Ok(ClaimType::Maturity),
            "other" => Ok(ClaimType::Other),
            _ => Err(ClaimError::validation(format!("unknown claim type: {s}"))),
        }
    }
}

/// One entry of the append-only status audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: ClaimStatus,
    /// Who drove the transition
    pub actor: ActorId,
    pub at: DateTime<Utc>,
    pub note: String,
}

/// A note attached by an agent or admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimNote {
    pub text: String,
    pub author: ActorId,
    pub created_at: DateTime<Utc>,
    /// Internal notes are hidden from customers at the presentation layer
    pub is_internal: bool,
}

/// A reference to an externally stored supporting document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDocument {
    pub name: String,
    /// Storage reference returned by the document-storage collaborator,
    /// stored verbatim
    pub url: String,
    pub content_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// A claim against a purchased policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Human-readable reference, immutable once persisted
    pub claim_number: String,
    /// Policy definition the purchased entry instantiates
    pub policy_id: PolicyId,
    /// Owning customer account
    pub customer_id: CustomerId,
    pub claim_type: ClaimType,
    pub status: ClaimStatus,
    /// Date of the triggering event; the settlement reference date for
    /// maturity claims
    pub incident_date: NaiveDate,
    pub description: String,
    pub requested_amount: Money,
    /// Zero until an admin sets it during a status change
    pub approved_amount: Money,
    /// Populated only for maturity claims
    pub maturity: Option<MaturitySettlement>,
    /// Append-only; the first entry always records creation
    pub timeline: Vec<TimelineEntry>,
    pub notes: Vec<ClaimNote>,
    pub documents: Vec<ClaimDocument>,
    /// Submitting actor; may differ from the customer when an agent or
    /// admin files on their behalf
    pub created_by: ActorId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Opens a new claim in `Submitted` with its creation timeline entry
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        claim_number: String,
        policy_id: PolicyId,
        customer_id: CustomerId,
        claim_type: ClaimType,
        incident_date: NaiveDate,
        description: String,
        requested_amount: Money,
        opened_by: ActorId,
    ) -> Self {
        let now = Utc::now();
        let currency = requested_amount.currency();

        Self {
            id: ClaimId::new_v7(),
            claim_number,
            policy_id,
            customer_id,
            claim_type,
            status: ClaimStatus::Submitted,
            incident_date,
            description,
            requested_amount,
            approved_amount: Money::zero(currency),
            maturity: None,
            timeline: vec![TimelineEntry {
                status: ClaimStatus::Submitted,
                actor: opened_by,
                at: now,
                note: "Claim created".to_string(),
            }],
            notes: Vec::new(),
            documents: Vec::new(),
            created_by: opened_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches maturity settlement figures (maturity claims only)
    pub fn with_maturity(mut self, settlement: MaturitySettlement) -> Self {
        self.maturity = Some(settlement);
        self
    }

    /// Renumbers a not-yet-persisted claim after a storage conflict
    pub fn with_claim_number(mut self, claim_number: String) -> Self {
        self.claim_number = claim_number;
        self
    }

    /// Moves to a new status and appends the matching timeline entry.
    ///
    /// When no note is supplied the entry carries a generated
    /// "Status updated to <status>" note.
    pub fn record_status(&mut self, status: ClaimStatus, actor: ActorId, note: Option<String>) {
        let note = note.unwrap_or_else(|| format!("Status updated to {status}"));
        let now = Utc::now();
        self.status = status;
        self.timeline.push(TimelineEntry {
            status,
            actor,
            at: now,
            note,
        });
        self.updated_at = now;
    }

    /// Appends a note
    pub fn add_note(&mut self, text: String, author: ActorId, is_internal: bool) {
        let now = Utc::now();
        self.notes.push(ClaimNote {
            text,
            author,
            created_at: now,
            is_internal,
        });
        self.updated_at = now;
    }

    /// Appends a stored-document reference
    pub fn attach_document(&mut self, name: String, url: String, content_type: Option<String>) {
        let now = Utc::now();
        self.documents.push(ClaimDocument {
            name,
            url,
            content_type,
            uploaded_at: now,
        });
        self.updated_at = now;
    }
}
