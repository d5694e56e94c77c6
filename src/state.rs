// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AccessPolicy, PrincipalLoader, TokenCodec};
use crate::service::UserDirectory;
use crate::storage::BlogDatabase;

/// Shared handles for handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<BlogDatabase>,
    pub tokens: Arc<TokenCodec>,
    pub principals: Arc<dyn PrincipalLoader>,
    pub policy: Arc<AccessPolicy>,
}

impl AppState {
    /// State with principals loaded from the users table and the default
    /// access policy.
    pub fn new(db: Arc<BlogDatabase>, tokens: TokenCodec) -> Self {
        Self {
            principals: Arc::new(UserDirectory::new(db.clone())),
            db,
            tokens: Arc::new(tokens),
            policy: Arc::new(AccessPolicy::default()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    pub const TEST_SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    /// Fresh state over a temporary database. Keep the `TempDir` alive for
    /// the duration of the test.
    pub fn test_state() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let db = Arc::new(BlogDatabase::open(&dir.path().join("blog.redb")).unwrap());
        let tokens = TokenCodec::new(TEST_SECRET, 60_000).unwrap();
        (dir, AppState::new(db, tokens))
    }
}
