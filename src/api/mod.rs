// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    lifecycle::LinkStatus,
    models::{
        CreateAadhaarLinkRequest, CreateDocumentRequest, CreatePanLinkRequest,
        CreateSessionRequest, DocumentCreatedResponse, DocumentSide, DocumentState,
        DocumentSummary, DocumentType, FinalizeResponse, Jurisdiction, LinkActionResponse,
        LinkStatusResponse, LoginResponse, SessionCreatedResponse, SessionStatus,
        SessionSummaryResponse, VerifyOtpRequest,
    },
    state::AppState,
};

pub mod aadhaar;
pub mod health;
pub mod kyc;
pub mod login;
pub mod pan;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/pan/link-requests", post(pan::create_link_request))
        .route("/pan/link-requests/{request_id}", get(pan::get_status))
        .route(
            "/pan/link-requests/{request_id}/send-otp",
            post(pan::send_otp),
        )
        .route(
            "/pan/link-requests/{request_id}/verify-otp",
            post(pan::verify_otp),
        )
        .route(
            "/pan/link-requests/{request_id}/finalize",
            post(pan::finalize),
        )
        .route("/aadhaar/link-requests", post(aadhaar::create_link_request))
        .route(
            "/aadhaar/link-requests/{request_id}",
            get(aadhaar::get_status),
        )
        .route(
            "/aadhaar/link-requests/{request_id}/send-otp",
            post(aadhaar::send_otp),
        )
        .route(
            "/aadhaar/link-requests/{request_id}/verify-otp",
            post(aadhaar::verify_otp),
        )
        .route(
            "/aadhaar/link-requests/{request_id}/finalize",
            post(aadhaar::finalize),
        )
        .route("/kyc/sessions", post(kyc::create_session))
        .route(
            "/kyc/sessions/{session_id}/documents",
            post(kyc::add_document),
        )
        .route(
            "/kyc/sessions/{session_id}/summary",
            get(kyc::session_summary),
        );

    Router::new()
        .route("/login", post(login::login))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        login::login,
        health::health,
        health::liveness,
        pan::create_link_request,
        pan::send_otp,
        pan::verify_otp,
        pan::finalize,
        pan::get_status,
        aadhaar::create_link_request,
        aadhaar::send_otp,
        aadhaar::verify_otp,
        aadhaar::finalize,
        aadhaar::get_status,
        kyc::create_session,
        kyc::add_document,
        kyc::session_summary
    ),
    components(
        schemas(
            LoginResponse,
            LinkStatus,
            CreatePanLinkRequest,
            CreateAadhaarLinkRequest,
            VerifyOtpRequest,
            LinkActionResponse,
            FinalizeResponse,
            LinkStatusResponse,
            Jurisdiction,
            DocumentType,
            DocumentSide,
            SessionStatus,
            DocumentState,
            CreateSessionRequest,
            SessionCreatedResponse,
            CreateDocumentRequest,
            DocumentCreatedResponse,
            DocumentSummary,
            SessionSummaryResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Token issuance"),
        (name = "PAN", description = "PAN linking lifecycle"),
        (name = "Aadhaar", description = "Aadhaar linking lifecycle"),
        (name = "KYC", description = "KYC onboarding sessions"),
        (name = "Health", description = "Probes")
    )
)]
struct ApiDoc;
