// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::storage::LinkDatabase;

/// Shared application state injected into every handler.
///
/// There is no in-process mutable state beyond the persistent store; redb
/// serializes writers internally, so the database handle needs no lock.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<LinkDatabase>,
    pub token_keys: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(db: LinkDatabase, token_keys: TokenKeys) -> Self {
        Self {
            db: Arc::new(db),
            token_keys: Arc::new(token_keys),
        }
    }

    /// State backed by a throwaway database file. The returned directory
    /// guard must be kept alive for the duration of the test.
    #[cfg(test)]
    pub fn for_tests() -> (Self, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = LinkDatabase::open(&dir.path().join("test.redb")).expect("open db");
        let keys = TokenKeys::from_secret(b"test-secret");
        (Self::new(db, keys), dir)
    }
}
