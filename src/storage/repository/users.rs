// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User accounts.
//!
//! Usernames and e-mail addresses are unique. Both are unique indexes on
//! the users table, so the check and the insert share one write
//! transaction and lookups by either key avoid a table scan.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::EntityRepository;
use crate::auth::Role;
use crate::storage::{Entity, StorageResult, UniqueIndex};

/// Stored account. `password_hash` is an Argon2 PHC string and is never
/// serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
}

pub const BY_USERNAME: UniqueIndex<User> = UniqueIndex {
    table: "users_by_username",
    key: username_key,
    conflict: "Username is already taken",
};

pub const BY_EMAIL: UniqueIndex<User> = UniqueIndex {
    table: "users_by_email",
    key: email_key,
    conflict: "Email is already registered",
};

fn username_key(user: &User) -> &str {
    &user.username
}

fn email_key(user: &User) -> &str {
    &user.email
}

impl Entity for User {
    const TABLE_NAME: &'static str = "users";
    const RESOURCE: &'static str = "User";
    const SORTABLE: &'static [&'static str] = &["id", "name", "username", "email"];
    const UNIQUE: &'static [UniqueIndex<Self>] = &[BY_USERNAME, BY_EMAIL];

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn compare_by(&self, other: &Self, property: &str) -> Option<Ordering> {
        match property {
            "id" => Some(self.id.cmp(&other.id)),
            "name" => Some(self.name.cmp(&other.name)),
            "username" => Some(self.username.cmp(&other.username)),
            "email" => Some(self.email.cmp(&other.email)),
            _ => None,
        }
    }
}

pub type UserRepository<'a> = EntityRepository<'a, User>;

impl UserRepository<'_> {
    pub fn find_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        self.db.find_unique(&BY_USERNAME, username)
    }

    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        self.db.find_unique(&BY_EMAIL, email)
    }

    /// Match `login` against the username first, then the e-mail.
    pub fn find_by_username_or_email(&self, login: &str) -> StorageResult<Option<User>> {
        match self.find_by_username(login)? {
            Some(user) => Ok(Some(user)),
            None => self.find_by_email(login),
        }
    }

    pub fn exists_by_username(&self, username: &str) -> StorageResult<bool> {
        Ok(self.find_by_username(username)?.is_some())
    }
}
