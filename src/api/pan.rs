// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PAN link-request lifecycle handlers.

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
    masking::{mask_pan, validate_otp, validate_pan_number},
    models::{
        generate_id, CreatePanLinkRequest, FinalizeResponse, LinkActionResponse,
        LinkStatusResponse, VerifyOtpRequest,
    },
    state::AppState,
    storage::{StoreError, StoredPanRequest},
};

#[utoipa::path(
    post,
    path = "/v1/pan/link-requests",
    request_body = CreatePanLinkRequest,
    tag = "PAN",
    responses(
        (status = 201, body = LinkActionResponse),
        (status = 422, description = "Malformed PAN")
    )
)]
pub async fn create_link_request(
    State(state): State<AppState>,
    Auth(_claims): Auth,
    Json(request): Json<CreatePanLinkRequest>,
) -> Result<(StatusCode, Json<LinkActionResponse>), ApiError> {
    validate_pan_number(&request.pan_number)?;

    let now = Utc::now();
    let stored = StoredPanRequest {
        request_id: generate_id("PAN_"),
        masked_pan: mask_pan(&request.pan_number),
        pan_number: request.pan_number,
        customer_name: request.customer_name,
        status: crate::lifecycle::LinkStatus::initial(),
        created_at: now,
        updated_at: now,
    };
    state.db.create_pan_request(&stored)?;

    tracing::info!(request_id = %stored.request_id, "PAN link request created");
    Ok((
        StatusCode::CREATED,
        Json(LinkActionResponse {
            request_id: stored.request_id,
            status: stored.status,
            message: "Linking request initiated. Please send OTP.".to_string(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/v1/pan/link-requests/{request_id}/send-otp",
    params(("request_id" = String, Path, description = "Link request identifier")),
    tag = "PAN",
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
    let record = state.db.advance_pan(&request_id, Transition::SendOtp)?;
    Ok(Json(LinkActionResponse {
        request_id: record.request_id,
        status: record.status,
        message: "OTP has been sent to registered mobile number".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/pan/link-requests/{request_id}/verify-otp",
    params(("request_id" = String, Path, description = "Link request identifier")),
    request_body = VerifyOtpRequest,
    tag = "PAN",
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

    let record = state.db.advance_pan(&request_id, Transition::VerifyOtp)?;
    Ok(Json(LinkActionResponse {
        request_id: record.request_id,
        status: record.status,
        message: "OTP verified successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/pan/link-requests/{request_id}/finalize",
    params(("request_id" = String, Path, description = "Link request identifier")),
    tag = "PAN",
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
        .advance_pan(&request_id, Transition::Finalize)
        .map_err(|err| match err {
            StoreError::Lifecycle(_) => {
                ApiError::bad_request("OTP must be verified before finalizing link.")
            }
            other => other.into(),
        })?;

    tracing::info!(request_id = %record.request_id, "PAN linked");
    Ok(Json(FinalizeResponse {
        request_id: record.request_id,
        status: record.status,
        masked_value: record.masked_pan,
        message: "PAN has been successfully linked to the account".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/pan/link-requests/{request_id}",
    params(("request_id" = String, Path, description = "Link request identifier")),
    tag = "PAN",
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
    let record = state.db.get_pan_request(&request_id)?;
    Ok(Json(LinkStatusResponse {
        request_id: record.request_id,
        status: record.status,
        masked_value: record.masked_pan,
        updated_at: record.updated_at,
    }))
}
