//! API error handling
//!
//! Every failure leaving this layer is rendered as the uniform envelope
//! `{success: false, message}`. Domain errors carry their own HTTP status
//! mapping; transport-level failures (missing token, malformed multipart)
//! have dedicated variants.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_claims::ClaimError;

use crate::storage::StorageError;

/// Response envelope shared by every claim endpoint.
///
/// `data` is omitted from the JSON entirely when absent, so failures
/// never carry a partial payload.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// A successful envelope with a payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiEnvelope<()> {
    /// A failure envelope; no payload
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Business failure surfaced by the claims service
    #[error(transparent)]
    Domain(#[from] ClaimError),

    /// Missing or invalid bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed request outside the domain's reach, e.g. a broken
    /// multipart body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Document storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(ClaimError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(ClaimError::InvalidState(_)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(ClaimError::AccessDenied(_)) => StatusCode::FORBIDDEN,
            ApiError::Domain(ClaimError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Domain(ClaimError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The human-readable message carried in the envelope; domain
    /// variants shed their taxonomy prefix
    fn message(&self) -> String {
        match self {
            ApiError::Domain(err) => match err {
                ClaimError::Validation(msg)
                | ClaimError::AccessDenied(msg)
                | ClaimError::NotFound(msg)
                | ClaimError::InvalidState(msg)
                | ClaimError::Unavailable(msg) => msg.clone(),
            },
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Storage(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiEnvelope::error(self.message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_statuses() {
        let cases = [
            (
                ApiError::from(ClaimError::validation("policyId is required")),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(ClaimError::access_denied("only admins")),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::from(ClaimError::not_found("Claim X not found")),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(ClaimError::invalid_state("policy is claimed")),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(ClaimError::unavailable("pool exhausted")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status(), expected);
        }
    }

    #[test]
    fn test_message_drops_taxonomy_prefix() {
        let err = ApiError::from(ClaimError::validation("policyId is required"));
        assert_eq!(err.message(), "policyId is required");
    }

    #[test]
    fn test_failure_envelope_omits_data() {
        let json = serde_json::to_value(ApiEnvelope::error("boom")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "boom");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_envelope_carries_data() {
        let json = serde_json::to_value(ApiEnvelope::ok("done", 42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
    }
}
