// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stored record shapes, serialized to JSON inside redb tables.
//!
//! Masked display forms are computed once when the record is created and are
//! never recomputed; `updated_at` is refreshed on every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lifecycle::LinkStatus;
use crate::models::{DocumentSide, DocumentState, DocumentType, Jurisdiction, SessionStatus};

/// One PAN linking attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredPanRequest {
    /// Primary key (`PAN_` prefixed).
    pub request_id: String,
    /// PAN stored in the clear, matching upstream policy (see DESIGN.md).
    pub pan_number: String,
    /// Display form, fixed at creation.
    pub masked_pan: String,
    pub customer_name: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One Aadhaar linking attempt. The raw Aadhaar number is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredAadhaarRequest {
    /// Primary key (`ADR_` prefixed).
    pub request_id: String,
    /// SHA-256 hex digest of the Aadhaar number.
    pub aadhaar_hash: String,
    /// Display form (`XXXX-XXXX-1234`), fixed at creation.
    pub masked_aadhaar: String,
    pub consent_obtained: bool,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A KYC onboarding session; owns zero or more documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredKycSession {
    /// Primary key (`sess_` prefixed).
    pub id: String,
    pub kyc_purpose: String,
    pub jurisdiction: Jurisdiction,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

/// A document uploaded into a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredKycDocument {
    /// Document identifier (`doc_` prefixed).
    pub id: String,
    /// Owning session; documents never outlive or change sessions.
    pub session_id: String,
    pub document_type: DocumentType,
    pub side: DocumentSide,
    pub country: String,
    pub state: DocumentState,
    pub uploaded_at: DateTime<Utc>,
}
