// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! KYC session and document handlers.
//!
//! Sessions are containers: they are created in `CREATED` and never
//! transitioned; uploaded documents land in `UPLOADED` and stay there. The
//! summary is a projection computed on read, never cached.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        generate_id, CreateDocumentRequest, CreateSessionRequest, DocumentCreatedResponse,
        DocumentState, DocumentSummary, SessionCreatedResponse, SessionStatus,
        SessionSummaryResponse,
    },
    state::AppState,
    storage::{StoredKycDocument, StoredKycSession},
};

#[utoipa::path(
    post,
    path = "/v1/kyc/sessions",
    request_body = CreateSessionRequest,
    tag = "KYC",
    responses((status = 201, body = SessionCreatedResponse))
)]
pub async fn create_session(
    State(state): State<AppState>,
    Auth(_claims): Auth,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), ApiError> {
    let session = StoredKycSession {
        id: generate_id("sess_"),
        kyc_purpose: request.kyc_purpose,
        jurisdiction: request.jurisdiction,
        status: SessionStatus::Created,
        created_at: Utc::now(),
    };
    state.db.create_session(&session)?;

    tracing::info!(session_id = %session.id, "KYC session created");
    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id: session.id,
            status: session.status,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/v1/kyc/sessions/{session_id}/documents",
    params(("session_id" = String, Path, description = "KYC session identifier")),
    request_body = CreateDocumentRequest,
    tag = "KYC",
    responses(
        (status = 201, body = DocumentCreatedResponse),
        (status = 404, description = "Unknown session id")
    )
)]
pub async fn add_document(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Auth(_claims): Auth,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentCreatedResponse>), ApiError> {
    let document = StoredKycDocument {
        id: generate_id("doc_"),
        session_id,
        document_type: request.document_type,
        side: request.side,
        country: request.country,
        state: DocumentState::Uploaded,
        uploaded_at: Utc::now(),
    };
    state.db.add_document(&document)?;

    tracing::info!(
        session_id = %document.session_id,
        document_id = %document.id,
        "KYC document uploaded"
    );
    Ok((
        StatusCode::CREATED,
        Json(DocumentCreatedResponse {
            document_id: document.id,
            status: document.state,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/kyc/sessions/{session_id}/summary",
    params(("session_id" = String, Path, description = "KYC session identifier")),
    tag = "KYC",
    responses(
        (status = 200, body = SessionSummaryResponse),
        (status = 404, description = "Unknown session id")
    )
)]
pub async fn session_summary(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Auth(_claims): Auth,
) -> Result<Json<SessionSummaryResponse>, ApiError> {
    let session = state.db.get_session(&session_id)?;
    let documents: Vec<DocumentSummary> = state
        .db
        .session_documents(&session_id)?
        .into_iter()
        .map(|doc| DocumentSummary {
            id: doc.id,
            document_type: doc.document_type,
            status: doc.state,
        })
        .collect();

    Ok(Json(SessionSummaryResponse {
        session_id: session.id,
        status: session.status,
        document_count: documents.len(),
        documents,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::admin;
    use crate::models::{DocumentSide, DocumentType, Jurisdiction};

    async fn open_session(state: &AppState) -> String {
        let (_, Json(response)) = create_session(
            State(state.clone()),
            admin(),
            Json(CreateSessionRequest {
                kyc_purpose: "ACCOUNT_OPENING".into(),
                jurisdiction: Jurisdiction::In,
                customer: serde_json::json!({"name": "Asha Rao"}),
            }),
        )
        .await
        .expect("session creation succeeds");
        response.session_id
    }

    fn passport_front() -> CreateDocumentRequest {
        CreateDocumentRequest {
            document_type: DocumentType::Passport,
            side: DocumentSide::Front,
            country: "IN".into(),
        }
    }

    #[tokio::test]
    async fn session_starts_created_and_empty() {
        let (state, _dir) = AppState::for_tests();
        let session_id = open_session(&state).await;
        assert!(session_id.starts_with("sess_"));

        let Json(summary) = session_summary(Path(session_id), State(state), admin())
            .await
            .unwrap();
        assert_eq!(summary.status, SessionStatus::Created);
        assert_eq!(summary.document_count, 0);
        assert!(summary.documents.is_empty());
    }

    #[tokio::test]
    async fn uploaded_documents_appear_in_summary() {
        let (state, _dir) = AppState::for_tests();
        let session_id = open_session(&state).await;

        let (status, Json(first)) = add_document(
            Path(session_id.clone()),
            State(state.clone()),
            admin(),
            Json(passport_front()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first.status, DocumentState::Uploaded);
        assert!(first.document_id.starts_with("doc_"));

        add_document(
            Path(session_id.clone()),
            State(state.clone()),
            admin(),
            Json(CreateDocumentRequest {
                document_type: DocumentType::Aadhaar,
                side: DocumentSide::Back,
                country: "IN".into(),
            }),
        )
        .await
        .unwrap();

        let Json(summary) = session_summary(Path(session_id), State(state), admin())
            .await
            .unwrap();
        assert_eq!(summary.document_count, 2);
        assert_eq!(summary.documents.len(), 2);
        assert!(summary
            .documents
            .iter()
            .all(|d| d.status == DocumentState::Uploaded));
        assert!(summary.documents.iter().any(|d| d.id == first.document_id));
    }

    #[tokio::test]
    async fn document_for_unknown_session_is_404_and_not_stored() {
        let (state, _dir) = AppState::for_tests();

        let err = add_document(
            Path("sess_FFFFFFFF".into()),
            State(state.clone()),
            admin(),
            Json(passport_front()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        // The rejected upload must not leave an orphan behind.
        let session_id = open_session(&state).await;
        let Json(summary) = session_summary(Path(session_id), State(state), admin())
            .await
            .unwrap();
        assert_eq!(summary.document_count, 0);
    }

    #[tokio::test]
    async fn summary_for_unknown_session_is_404() {
        let (state, _dir) = AppState::for_tests();
        let err = session_summary(Path("sess_FFFFFFFF".into()), State(state), admin())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
