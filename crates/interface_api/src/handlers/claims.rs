//! Claims handlers

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{Actor, ClaimId};

use crate::dto::claims::{
    AddNoteRequest, ClaimDetailResponse, ClaimResponse, CreateClaimRequest, DocumentUpload,
    ListClaimsQuery, UpdateStatusRequest,
};
use crate::error::{ApiEnvelope, ApiError};
use crate::AppState;

/// Opens a new claim against a purchased policy
pub async fn create_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ApiEnvelope<ClaimResponse>>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let claim = state
        .service
        .open_claim(&actor, request.into_open_claim()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok(
            "Claim created",
            ClaimResponse::for_actor(&actor, &claim),
        )),
    ))
}

/// Lists claims visible to the actor, newest first
pub async fn list_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ListClaimsQuery>,
) -> Result<Json<ApiEnvelope<Vec<ClaimResponse>>>, ApiError> {
    let claims = state
        .service
        .list_claims(&actor, query.into_filter()?)
        .await?;

    let data = claims
        .iter()
        .map(|claim| ClaimResponse::for_actor(&actor, claim))
        .collect();

    Ok(Json(ApiEnvelope::ok("Claims retrieved", data)))
}

/// Gets a claim with its policy and customer populated
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiEnvelope<ClaimDetailResponse>>, ApiError> {
    let detail = state.service.get_claim(&actor, ClaimId::from(id)).await?;

    Ok(Json(ApiEnvelope::ok(
        "Claim retrieved",
        ClaimDetailResponse::for_actor(&actor, &detail),
    )))
}

/// Moves a claim to a new status (admin only)
pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiEnvelope<ClaimResponse>>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let claim = state
        .service
        .update_status(&actor, ClaimId::from(id), request.into_status_change()?)
        .await?;

    Ok(Json(ApiEnvelope::ok(
        "Claim status updated",
        ClaimResponse::for_actor(&actor, &claim),
    )))
}

/// Appends a staff note to a claim
pub async fn add_note(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddNoteRequest>,
) -> Result<Json<ApiEnvelope<ClaimResponse>>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let claim = state
        .service
        .add_note(
            &actor,
            ClaimId::from(id),
            request.text.unwrap_or_default(),
            request.is_internal.unwrap_or(false),
        )
        .await?;

    Ok(Json(ApiEnvelope::ok(
        "Note added",
        ClaimResponse::for_actor(&actor, &claim),
    )))
}

/// Stores an uploaded document and attaches its reference to the claim.
///
/// When the attachment fails after the bytes were stored, the stored
/// document is removed best-effort; a cleanup failure is logged, not
/// surfaced.
pub async fn attach_document(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiEnvelope<ClaimResponse>>, ApiError> {
    let mut upload = read_upload(multipart).await?;
    let bytes = upload
        .bytes
        .take()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| ApiError::BadRequest("file is required".to_string()))?;

    let url = state
        .documents
        .store(&upload.document_name(), &bytes)
        .await?;

    let attachment = upload.into_attachment(url.clone());
    match state
        .service
        .attach_document(&actor, ClaimId::from(id), attachment)
        .await
    {
        Ok(claim) => Ok(Json(ApiEnvelope::ok(
            "Document attached",
            ClaimResponse::for_actor(&actor, &claim),
        ))),
        Err(err) => {
            if let Err(cleanup) = state.documents.remove(&url).await {
                warn!(url = %url, error = %cleanup, "failed to remove stored document after attachment failure");
            }
            Err(err.into())
        }
    }
}

/// Drains the multipart body into a [`DocumentUpload`].
///
/// Recognized fields: `file` (the document bytes), `name` (display name
/// override), `type` (content-type override). Unknown fields are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<DocumentUpload, ApiError> {
    let mut upload = DocumentUpload::default();
    let mut type_override = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
                upload.bytes = Some(bytes.to_vec());
            }
            Some("name") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read field: {e}")))?;
                if !text.trim().is_empty() {
                    upload.name = Some(text);
                }
            }
            Some("type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read field: {e}")))?;
                if !text.trim().is_empty() {
                    type_override = Some(text);
                }
            }
            _ => {}
        }
    }

    if let Some(content_type) = type_override {
        upload.content_type = Some(content_type);
    }

    Ok(upload)
}
