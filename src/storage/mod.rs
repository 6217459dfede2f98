// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persistent Store
//!
//! Durable storage for link requests and KYC sessions, backed by redb
//! (pure Rust, ACID). Every mutation is a single write transaction doing a
//! read-modify-write, so concurrent steps against the same identifier
//! serialize instead of losing updates, and a failed precondition aborts
//! without touching the stored record.
//!
//! ## Table Layout
//!
//! - `pan_link_requests`: request_id → serialized StoredPanRequest
//! - `aadhaar_link_requests`: request_id → serialized StoredAadhaarRequest
//! - `kyc_sessions`: session_id → serialized StoredKycSession
//! - `kyc_documents`: composite key (session_id|document_id) → serialized
//!   StoredKycDocument, so one range scan yields a session's documents

pub mod database;
pub mod records;

pub use database::{LinkDatabase, StoreError, StoreResult};
pub use records::{
    StoredAadhaarRequest, StoredKycDocument, StoredKycSession, StoredPanRequest,
};
