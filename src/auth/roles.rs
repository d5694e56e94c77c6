// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};

/// Roles a principal can be granted.
///
/// ## Roles
///
/// - `Admin` - Manages posts and categories
/// - `User` - Registered reader, may comment
///
/// There is no hierarchy: an operation requiring `Admin` is satisfied only by
/// a principal holding `Admin`. The seeded administrator is granted both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Blog administrator
    Admin,
    /// Registered user
    User,
}

impl Role {
    /// Canonical upper-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
