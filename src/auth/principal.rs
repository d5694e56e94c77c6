// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated identities and the contract for loading them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{AuthError, Role};

/// An identity with its granted roles.
///
/// Loaded from the user store on every authenticated request; never cached
/// between requests, so role changes apply to the next request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Canonical username
    pub username: String,
    /// Roles granted to this user
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Check if this principal holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Check if this principal is an administrator.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Resolves a token subject to a [`Principal`].
///
/// Implementations fail with [`AuthError::PrincipalNotFound`] when no such
/// user exists. Calls are synchronous and expected to be quick.
pub trait PrincipalLoader: Send + Sync {
    fn load_by_username(&self, username: &str) -> Result<Principal, AuthError>;
}
