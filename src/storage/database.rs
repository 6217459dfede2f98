// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded onboarding database backed by redb (pure Rust, ACID).
//!
//! One `LinkDatabase` instance is shared by all handlers. Each operation is a
//! single redb transaction; status transitions are applied inside the write
//! transaction, so a rejected transition aborts and leaves the record as it
//! was.

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};

use super::records::{
    StoredAadhaarRequest, StoredKycDocument, StoredKycSession, StoredPanRequest,
};
use crate::lifecycle::{LifecycleError, LinkStatus, Transition};

// =============================================================================
// Table Definitions
// =============================================================================

/// PAN link requests: request_id → JSON bytes.
const PAN_REQUESTS: TableDefinition<&str, &[u8]> = TableDefinition::new("pan_link_requests");

/// Aadhaar link requests: request_id → JSON bytes.
const AADHAAR_REQUESTS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("aadhaar_link_requests");

/// KYC sessions: session_id → JSON bytes.
const KYC_SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("kyc_sessions");

/// KYC documents: composite key `session_id|document_id` → JSON bytes.
/// The composite key makes a session's documents one contiguous range.
const KYC_DOCUMENTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("kyc_documents");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Composite Key Helpers
// =============================================================================

/// Build the composite key for the kyc_documents table.
fn document_key(session_id: &str, document_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(session_id.len() + 1 + document_id.len());
    key.extend_from_slice(session_id.as_bytes());
    key.push(b'|');
    key.extend_from_slice(document_id.as_bytes());
    key
}

/// Build a prefix for range scanning all documents of a session.
fn session_prefix(session_id: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(session_id.len() + 1);
    prefix.extend_from_slice(session_id.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Build the upper bound for a session range scan (prefix plus 0xFF padding).
fn session_prefix_end(session_id: &str) -> Vec<u8> {
    let mut end = session_prefix(session_id);
    end.extend_from_slice(&[0xFF; 20]);
    end
}

// =============================================================================
// Lifecycled records
// =============================================================================

/// Records that carry a link-request status and mutation timestamp.
trait Lifecycled: Serialize + DeserializeOwned {
    fn status(&self) -> LinkStatus;
    fn set_status(&mut self, status: LinkStatus);
    fn touch(&mut self);
}

impl Lifecycled for StoredPanRequest {
    fn status(&self) -> LinkStatus {
        self.status
    }
    fn set_status(&mut self, status: LinkStatus) {
        self.status = status;
    }
    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Lifecycled for StoredAadhaarRequest {
    fn status(&self) -> LinkStatus {
        self.status
    }
    fn set_status(&mut self, status: LinkStatus) {
        self.status = status;
    }
    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// LinkDatabase
// =============================================================================

/// Embedded ACID store for link requests, sessions, and documents.
pub struct LinkDatabase {
    db: Database,
}

impl LinkDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PAN_REQUESTS)?;
            let _ = write_txn.open_table(AADHAAR_REQUESTS)?;
            let _ = write_txn.open_table(KYC_SESSIONS)?;
            let _ = write_txn.open_table(KYC_DOCUMENTS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Generic record operations
    // =========================================================================

    /// Insert a fresh record; the key must not already exist, so a create is
    /// all-or-nothing even on generated-id collision.
    fn insert_new<T: Serialize>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        entity: &str,
        key: &str,
        record: &T,
    ) -> StoreResult<()> {
        let json = serde_json::to_vec(record)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut tbl = write_txn.open_table(table)?;
            if tbl.get(key)?.is_some() {
                return Err(StoreError::AlreadyExists(format!("{entity} {key}")));
            }
            tbl.insert(key, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a single record by key.
    fn get_record<T: DeserializeOwned>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        entity: &str,
        key: &str,
    ) -> StoreResult<T> {
        let read_txn = self.db.begin_read()?;
        let tbl = read_txn.open_table(table)?;
        match tbl.get(key)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StoreError::NotFound(format!("{entity} {key}"))),
        }
    }

    /// Read-modify-write a record inside one write transaction. If `apply`
    /// fails the transaction is dropped without committing.
    fn update_record<T, F>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        entity: &str,
        key: &str,
        apply: F,
    ) -> StoreResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> StoreResult<()>,
    {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut tbl = write_txn.open_table(table)?;

            let existing_bytes = {
                let existing = tbl
                    .get(key)?
                    .ok_or_else(|| StoreError::NotFound(format!("{entity} {key}")))?;
                existing.value().to_vec()
            };

            let mut record: T = serde_json::from_slice(&existing_bytes)?;
            apply(&mut record)?;

            let json = serde_json::to_vec(&record)?;
            tbl.insert(key, json.as_slice())?;
            record
        };
        write_txn.commit()?;
        Ok(updated)
    }

    /// Apply a lifecycle transition to a stored link request.
    fn advance<T: Lifecycled>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        request_id: &str,
        transition: Transition,
    ) -> StoreResult<T> {
        self.update_record(table, "Request", request_id, |record: &mut T| {
            let next = transition.apply(record.status())?;
            record.set_status(next);
            record.touch();
            Ok(())
        })
    }

    // =========================================================================
    // PAN link requests
    // =========================================================================

    pub fn create_pan_request(&self, request: &StoredPanRequest) -> StoreResult<()> {
        self.insert_new(PAN_REQUESTS, "Request", &request.request_id, request)
    }

    pub fn get_pan_request(&self, request_id: &str) -> StoreResult<StoredPanRequest> {
        self.get_record(PAN_REQUESTS, "Request", request_id)
    }

    pub fn advance_pan(
        &self,
        request_id: &str,
        transition: Transition,
    ) -> StoreResult<StoredPanRequest> {
        self.advance(PAN_REQUESTS, request_id, transition)
    }

    // =========================================================================
    // Aadhaar link requests
    // =========================================================================

    pub fn create_aadhaar_request(&self, request: &StoredAadhaarRequest) -> StoreResult<()> {
        self.insert_new(AADHAAR_REQUESTS, "Request", &request.request_id, request)
    }

    pub fn get_aadhaar_request(&self, request_id: &str) -> StoreResult<StoredAadhaarRequest> {
        self.get_record(AADHAAR_REQUESTS, "Request", request_id)
    }

    pub fn advance_aadhaar(
        &self,
        request_id: &str,
        transition: Transition,
    ) -> StoreResult<StoredAadhaarRequest> {
        self.advance(AADHAAR_REQUESTS, request_id, transition)
    }

    // =========================================================================
    // KYC sessions and documents
    // =========================================================================

    pub fn create_session(&self, session: &StoredKycSession) -> StoreResult<()> {
        self.insert_new(KYC_SESSIONS, "Session", &session.id, session)
    }

    pub fn get_session(&self, session_id: &str) -> StoreResult<StoredKycSession> {
        self.get_record(KYC_SESSIONS, "Session", session_id)
    }

    /// Attach a document to an existing session. The existence check and the
    /// insert share one write transaction, so a document can never be created
    /// against a session that was not durably stored.
    pub fn add_document(&self, document: &StoredKycDocument) -> StoreResult<()> {
        let json = serde_json::to_vec(document)?;
        let write_txn = self.db.begin_write()?;
        {
            let sessions = write_txn.open_table(KYC_SESSIONS)?;
            if sessions.get(document.session_id.as_str())?.is_none() {
                return Err(StoreError::NotFound(format!(
                    "Session {}",
                    document.session_id
                )));
            }
            drop(sessions);

            let mut docs = write_txn.open_table(KYC_DOCUMENTS)?;
            let key = document_key(&document.session_id, &document.id);
            if docs.get(key.as_slice())?.is_some() {
                return Err(StoreError::AlreadyExists(format!(
                    "Document {}",
                    document.id
                )));
            }
            docs.insert(key.as_slice(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// All documents of a session, in key order. Fails with `NotFound` when
    /// the session itself does not exist.
    pub fn session_documents(&self, session_id: &str) -> StoreResult<Vec<StoredKycDocument>> {
        let read_txn = self.db.begin_read()?;

        let sessions = read_txn.open_table(KYC_SESSIONS)?;
        if sessions.get(session_id)?.is_none() {
            return Err(StoreError::NotFound(format!("Session {session_id}")));
        }

        let docs = read_txn.open_table(KYC_DOCUMENTS)?;
        let prefix = session_prefix(session_id);
        let end = session_prefix_end(session_id);

        let mut documents = Vec::new();
        for entry in docs.range(prefix.as_slice()..end.as_slice())? {
            let entry = entry?;
            let document: StoredKycDocument = serde_json::from_slice(entry.1.value())?;
            documents.push(document);
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masking::{hash_aadhaar, mask_aadhaar, mask_pan};
    use crate::models::{
        generate_id, DocumentSide, DocumentState, DocumentType, Jurisdiction, SessionStatus,
    };

    fn test_db() -> (LinkDatabase, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = LinkDatabase::open(&dir.path().join("test.redb")).expect("open db");
        (db, dir)
    }

    fn pan_request(request_id: &str) -> StoredPanRequest {
        let now = Utc::now();
        StoredPanRequest {
            request_id: request_id.to_string(),
            pan_number: "ABCDE1234F".to_string(),
            masked_pan: mask_pan("ABCDE1234F"),
            customer_name: "Asha Rao".to_string(),
            status: LinkStatus::initial(),
            created_at: now,
            updated_at: now,
        }
    }

    fn aadhaar_request(request_id: &str) -> StoredAadhaarRequest {
        let now = Utc::now();
        StoredAadhaarRequest {
            request_id: request_id.to_string(),
            aadhaar_hash: hash_aadhaar("123456789012"),
            masked_aadhaar: mask_aadhaar("123456789012"),
            consent_obtained: true,
            status: LinkStatus::initial(),
            created_at: now,
            updated_at: now,
        }
    }

    fn session(id: &str) -> StoredKycSession {
        StoredKycSession {
            id: id.to_string(),
            kyc_purpose: "ACCOUNT_OPENING".to_string(),
            jurisdiction: Jurisdiction::In,
            status: SessionStatus::Created,
            created_at: Utc::now(),
        }
    }

    fn document(session_id: &str, id: &str) -> StoredKycDocument {
        StoredKycDocument {
            id: id.to_string(),
            session_id: session_id.to_string(),
            document_type: DocumentType::Pan,
            side: DocumentSide::Front,
            country: "IN".to_string(),
            state: DocumentState::Uploaded,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_round_trips() {
        let (db, _dir) = test_db();

        let pan = pan_request("PAN_00000001");
        db.create_pan_request(&pan).unwrap();
        assert_eq!(db.get_pan_request("PAN_00000001").unwrap(), pan);

        let aadhaar = aadhaar_request("ADR_00000001");
        db.create_aadhaar_request(&aadhaar).unwrap();
        assert_eq!(db.get_aadhaar_request("ADR_00000001").unwrap(), aadhaar);
    }

    #[test]
    fn get_unknown_request_is_not_found() {
        let (db, _dir) = test_db();
        assert!(matches!(
            db.get_pan_request("PAN_MISSING"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            db.get_aadhaar_request("ADR_MISSING"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let (db, _dir) = test_db();
        let pan = pan_request("PAN_00000001");
        db.create_pan_request(&pan).unwrap();
        assert!(matches!(
            db.create_pan_request(&pan),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn advance_walks_full_lifecycle_and_touches_updated_at() {
        let (db, _dir) = test_db();
        let request = aadhaar_request("ADR_00000001");
        db.create_aadhaar_request(&request).unwrap();

        let sent = db
            .advance_aadhaar("ADR_00000001", Transition::SendOtp)
            .unwrap();
        assert_eq!(sent.status, LinkStatus::OtpSent);
        assert!(sent.updated_at >= request.updated_at);

        let verified = db
            .advance_aadhaar("ADR_00000001", Transition::VerifyOtp)
            .unwrap();
        assert_eq!(verified.status, LinkStatus::OtpVerified);

        let linked = db
            .advance_aadhaar("ADR_00000001", Transition::Finalize)
            .unwrap();
        assert_eq!(linked.status, LinkStatus::Linked);
        assert_eq!(linked.masked_aadhaar, "XXXX-XXXX-9012");
    }

    #[test]
    fn premature_finalize_aborts_without_mutating() {
        let (db, _dir) = test_db();
        db.create_pan_request(&pan_request("PAN_00000001")).unwrap();

        let err = db
            .advance_pan("PAN_00000001", Transition::Finalize)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Lifecycle(LifecycleError::OtpNotVerified {
                current: LinkStatus::PendingOtp
            })
        ));

        // The aborted transaction must leave the record untouched.
        let stored = db.get_pan_request("PAN_00000001").unwrap();
        assert_eq!(stored.status, LinkStatus::PendingOtp);
    }

    #[test]
    fn advance_unknown_request_is_not_found() {
        let (db, _dir) = test_db();
        assert!(matches!(
            db.advance_pan("PAN_MISSING", Transition::SendOtp),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn document_requires_existing_session() {
        let (db, _dir) = test_db();
        let err = db
            .add_document(&document("sess_MISSING", "doc_00000001"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        // No orphan document may exist once the session is created.
        db.create_session(&session("sess_MISSING")).unwrap();
        assert!(db.session_documents("sess_MISSING").unwrap().is_empty());
    }

    #[test]
    fn session_documents_scans_only_own_prefix() {
        let (db, _dir) = test_db();
        db.create_session(&session("sess_A")).unwrap();
        db.create_session(&session("sess_B")).unwrap();

        db.add_document(&document("sess_A", "doc_00000001")).unwrap();
        db.add_document(&document("sess_A", "doc_00000002")).unwrap();
        db.add_document(&document("sess_B", "doc_00000003")).unwrap();

        let docs = db.session_documents("sess_A").unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.session_id == "sess_A"));
        assert_eq!(db.session_documents("sess_B").unwrap().len(), 1);
    }

    #[test]
    fn session_documents_for_unknown_session_is_not_found() {
        let (db, _dir) = test_db();
        assert!(matches!(
            db.session_documents("sess_MISSING"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn generated_ids_do_not_collide_in_practice() {
        let (db, _dir) = test_db();
        for _ in 0..32 {
            let request = pan_request(&generate_id("PAN_"));
            db.create_pan_request(&request).unwrap();
        }
    }
}
