// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Aadhaar link-request lifecycle handlers.
//!
//! Unlike PAN, the raw Aadhaar number never reaches the store: only its
//! SHA-256 digest and the masked display form are persisted.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    auth::Auth,
    error::ApiError,
    lifecycle::Transition,
    masking::{hash_aadhaar, mask_aadhaar, validate_aadhaar_number, validate_otp, ValidationError},
    models::{
        generate_id, CreateAadhaarLinkRequest, FinalizeResponse, LinkActionResponse,
        LinkStatusResponse, VerifyOtpRequest,
    },
    state::AppState,
    storage::{StoreError, StoredAadhaarRequest},
};

#[utoipa::path(
    post,
    path = "/v1/aadhaar/link-requests",
    request_body = CreateAadhaarLinkRequest,
    tag = "Aadhaar",
    responses(
        (status = 201, body = LinkActionResponse),
        (status = 422, description = "Malformed Aadhaar number or missing consent")
    )
)]
pub async fn create_link_request(
    State(state): State<AppState>,
    Auth(_claims): Auth,
    Json(request): Json<CreateAadhaarLinkRequest>,
) -> Result<(StatusCode, Json<LinkActionResponse>), ApiError> {
    validate_aadhaar_number(&request.aadhaar_number)?;
    if !request.consent_obtained {
        return Err(ValidationError {
            field: "consentObtained",
            message: "consent must be obtained before linking",
        }
        .into());
    }

    let now = Utc::now();
    let stored = StoredAadhaarRequest {
        request_id: generate_id("ADR_"),
        aadhaar_hash: hash_aadhaar(&request.aadhaar_number),
        masked_aadhaar: mask_aadhaar(&request.aadhaar_number),
        consent_obtained: request.consent_obtained,
        status: crate::lifecycle::LinkStatus::initial(),
        created_at: now,
        updated_at: now,
    };
    state.db.create_aadhaar_request(&stored)?;

    tracing::info!(request_id = %stored.request_id, "Aadhaar link request created");
    Ok((
        StatusCode::CREATED,
        Json(LinkActionResponse {
            request_id: stored.request_id,
            status: stored.status,
            message: "Aadhaar linking initiated. Consent verified.".to_string(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/v1/aadhaar/link-requests/{request_id}/send-otp",
    params(("request_id" = String, Path, description = "Link request identifier")),
    tag = "Aadhaar",
    responses(
        (status = 200, body = LinkActionResponse),
        (status = 404, description = "Unknown request id")
    )
)]
pub async fn send_otp(
    Path(request_id): Path<String>,
    State(state): State<AppState>,
    Auth(_claims): Auth,
) -> Result<Json<LinkActionResponse>, ApiError> {
    let record = state.db.advance_aadhaar(&request_id, Transition::SendOtp)?;
    Ok(Json(LinkActionResponse {
        request_id: record.request_id,
        status: record.status,
        message: "OTP successfully triggered via UIDAI gateway".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/aadhaar/link-requests/{request_id}/verify-otp",
    params(("request_id" = String, Path, description = "Link request identifier")),
    request_body = VerifyOtpRequest,
    tag = "Aadhaar",
    responses(
        (status = 200, body = LinkActionResponse),
        (status = 404, description = "Unknown request id"),
        (status = 422, description = "Malformed OTP")
    )
)]
pub async fn verify_otp(
    Path(request_id): Path<String>,
    State(state): State<AppState>,
    Auth(_claims): Auth,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<LinkActionResponse>, ApiError> {
    // Shape check only; no OTP is actually issued to compare against.
    validate_otp(&request.otp)?;

    let record = state
        .db
        .advance_aadhaar(&request_id, Transition::VerifyOtp)?;
    Ok(Json(LinkActionResponse {
        request_id: record.request_id,
        status: record.status,
        message: "UIDAI OTP validation successful".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/aadhaar/link-requests/{request_id}/finalize",
    params(("request_id" = String, Path, description = "Link request identifier")),
    tag = "Aadhaar",
    responses(
        (status = 200, body = FinalizeResponse),
        (status = 400, description = "OTP not verified yet"),
        (status = 404, description = "Unknown request id")
    )
)]
pub async fn finalize(
    Path(request_id): Path<String>,
    State(state): State<AppState>,
    Auth(_claims): Auth,
) -> Result<Json<FinalizeResponse>, ApiError> {
    let record = state
        .db
        .advance_aadhaar(&request_id, Transition::Finalize)
        .map_err(|err| match err {
            StoreError::Lifecycle(_) => {
                ApiError::bad_request("Aadhaar OTP must be verified before final link.")
            }
            other => other.into(),
        })?;

    tracing::info!(request_id = %record.request_id, "Aadhaar linked");
    Ok(Json(FinalizeResponse {
        request_id: record.request_id,
        status: record.status,
        masked_value: record.masked_aadhaar,
        message: "Aadhaar successfully linked to the primary account.".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/aadhaar/link-requests/{request_id}",
    params(("request_id" = String, Path, description = "Link request identifier")),
    tag = "Aadhaar",
    responses(
        (status = 200, body = LinkStatusResponse),
        (status = 404, description = "Unknown request id")
    )
)]
pub async fn get_status(
    Path(request_id): Path<String>,
    State(state): State<AppState>,
    Auth(_claims): Auth,
) -> Result<Json<LinkStatusResponse>, ApiError> {
    let record = state.db.get_aadhaar_request(&request_id)?;
    Ok(Json(LinkStatusResponse {
        request_id: record.request_id,
        status: record.status,
        masked_value: record.masked_aadhaar,
        updated_at: record.updated_at,
    }))
}
