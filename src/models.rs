// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation. Wire field names are camelCase (the `/login` response keeps
//! its original snake_case `access_token`).
//!
//! ## Model Categories
//!
//! - **PAN linking**: create / OTP / finalize / status DTOs
//! - **Aadhaar linking**: same shape, consent-gated
//! - **KYC sessions**: session creation, document upload, summary projection

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::lifecycle::LinkStatus;

/// Generate a resource identifier: fixed prefix + 8 uppercase hex characters
/// (e.g. `PAN_1A2B3C4D`).
pub fn generate_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", hex[..8].to_uppercase())
}

// =============================================================================
// Auth Models
// =============================================================================

/// Bearer token issued by `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// JWT to present as `Authorization: Bearer <token>` on `/v1` routes.
    pub access_token: String,
}

// =============================================================================
// Link Request Models (shared by PAN and Aadhaar)
// =============================================================================

/// Request to start a PAN link.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePanLinkRequest {
    /// PAN in the form `[A-Z]{5}[0-9]{4}[A-Z]`.
    pub pan_number: String,
    /// Name of the customer the PAN belongs to.
    pub customer_name: String,
}

/// Request to start an Aadhaar link.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAadhaarLinkRequest {
    /// 12-digit Aadhaar number. Only its hash and mask are stored.
    pub aadhaar_number: String,
    /// Must be `true`; linking without recorded consent is rejected.
    pub consent_obtained: bool,
}

/// OTP submission for the verify step.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyOtpRequest {
    /// 6-character one-time passcode.
    pub otp: String,
}

/// Response for create/send-otp/verify-otp steps.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkActionResponse {
    /// Identifier of the link request (`PAN_`/`ADR_` prefixed).
    pub request_id: String,
    /// Status after the step was applied.
    pub status: LinkStatus,
    /// Human-readable outcome message.
    pub message: String,
}

/// Response for a successful finalize step.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub request_id: String,
    /// Always `LINKED` on success.
    pub status: LinkStatus,
    /// Masked display form of the linked identifier.
    pub masked_value: String,
    pub message: String,
}

/// Status projection returned by the GET endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatusResponse {
    pub request_id: String,
    pub status: LinkStatus,
    /// Masked display form; the raw identifier is never returned.
    pub masked_value: String,
    /// RFC 3339 timestamp of the last mutation.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// =============================================================================
// KYC Session Models
// =============================================================================

/// Jurisdictions the KYC flow is available in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum Jurisdiction {
    #[serde(rename = "IN")]
    In,
}

/// Document categories accepted for upload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Pan,
    Aadhaar,
    Passport,
    VoterId,
}

/// Which face of the document was captured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentSide {
    Front,
    Back,
}

/// Session status. Sessions are created in `CREATED` and are not transitioned
/// further (document states are tracked independently).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Created,
}

/// Per-document state; uploads land in `UPLOADED` and stay there.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentState {
    Uploaded,
}

/// Request to open a KYC onboarding session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Why KYC is being performed (free text, e.g. "ACCOUNT_OPENING").
    pub kyc_purpose: String,
    /// Restricted to the enumerated allow-list.
    pub jurisdiction: Jurisdiction,
    /// Free-form customer details; accepted but not projected back.
    pub customer: serde_json::Value,
}

/// Response for session creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedResponse {
    /// Identifier of the new session (`sess_` prefixed).
    pub session_id: String,
    pub status: SessionStatus,
}

/// Request to attach a document to a session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub document_type: DocumentType,
    pub side: DocumentSide,
    /// Issuing country of the document.
    pub country: String,
}

/// Response for document upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCreatedResponse {
    /// Identifier of the new document (`doc_` prefixed).
    pub document_id: String,
    pub status: DocumentState,
}

/// Per-document projection inside the session summary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub status: DocumentState,
}

/// Session summary, computed on read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryResponse {
    pub session_id: String,
    pub status: SessionStatus,
    pub document_count: usize,
    pub documents: Vec<DocumentSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_use_prefix_and_8_uppercase_hex() {
        let id = generate_id("ADR_");
        assert!(id.starts_with("ADR_"));
        let suffix = &id["ADR_".len()..];
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));
    }

    #[test]
    fn enums_use_upstream_wire_names() {
        assert_eq!(serde_json::to_string(&Jurisdiction::In).unwrap(), r#""IN""#);
        assert_eq!(
            serde_json::to_string(&DocumentType::VoterId).unwrap(),
            r#""VOTER_ID""#
        );
        assert_eq!(
            serde_json::to_string(&DocumentSide::Front).unwrap(),
            r#""FRONT""#
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Created).unwrap(),
            r#""CREATED""#
        );
        assert_eq!(
            serde_json::to_string(&DocumentState::Uploaded).unwrap(),
            r#""UPLOADED""#
        );
    }

    #[test]
    fn request_fields_deserialize_from_camel_case() {
        let req: CreateAadhaarLinkRequest =
            serde_json::from_str(r#"{"aadhaarNumber":"123456789012","consentObtained":true}"#)
                .unwrap();
        assert_eq!(req.aadhaar_number, "123456789012");
        assert!(req.consent_obtained);

        let doc: CreateDocumentRequest =
            serde_json::from_str(r#"{"documentType":"PASSPORT","side":"BACK","country":"IN"}"#)
                .unwrap();
        assert_eq!(doc.document_type, DocumentType::Passport);
        assert_eq!(doc.side, DocumentSide::Back);
    }

    #[test]
    fn document_summary_serializes_type_key() {
        let summary = DocumentSummary {
            id: "doc_00000001".into(),
            document_type: DocumentType::Pan,
            status: DocumentState::Uploaded,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "PAN");
        assert_eq!(json["status"], "UPLOADED");
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        assert!(serde_json::from_str::<Jurisdiction>(r#""US""#).is_err());
        assert!(serde_json::from_str::<DocumentType>(r#""DRIVING_LICENSE""#).is_err());
    }
}
