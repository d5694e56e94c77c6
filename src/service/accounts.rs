// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Accounts: registration, login and the principal lookup used by the
//! authentication filter.

use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthError, Principal, PrincipalLoader, Role, TokenCodec};
use crate::error::ApiError;
use crate::models::{JwtAuthResponse, LoginDto, RegisterDto};
use crate::storage::{BlogDatabase, Repository, User, UserRepository};

pub const REGISTERED_MESSAGE: &str = "User registered successfully!";
const BAD_CREDENTIALS: &str = "Bad credentials";

/// Administrator account created at startup when configured.
#[derive(Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct AccountService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenCodec,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a BlogDatabase, tokens: &'a TokenCodec) -> Self {
        Self {
            users: UserRepository::new(db),
            tokens,
        }
    }

    /// Create a `USER` account. Username and e-mail must be unused; both
    /// are checked by the transaction that inserts the account.
    pub fn register(&self, dto: RegisterDto) -> Result<&'static str, ApiError> {
        let user = self.users.save(User {
            id: 0,
            name: dto.name,
            username: dto.username,
            email: dto.email,
            password_hash: hash_password(&dto.password)?,
            roles: [Role::User].into_iter().collect(),
        })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(REGISTERED_MESSAGE)
    }

    /// Check credentials (username or e-mail) and issue an access token for
    /// the account's username.
    pub fn login(&self, dto: LoginDto) -> Result<JwtAuthResponse, ApiError> {
        let user = self
            .users
            .find_by_username_or_email(&dto.username_or_email)?
            .filter(|user| verify_password(&dto.password, &user.password_hash));

        let Some(user) = user else {
            tracing::debug!(login = %dto.username_or_email, "Login rejected");
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        };

        let token = self.tokens.issue(&user.username)?;
        tracing::info!(username = %user.username, "User logged in");
        Ok(JwtAuthResponse::bearer(token))
    }

    /// Create the configured administrator unless the username is taken.
    /// Returns whether an account was created.
    pub fn seed_admin(&self, admin: &SeedAdmin) -> Result<bool, ApiError> {
        if self.users.exists_by_username(&admin.username)? {
            tracing::info!(username = %admin.username, "Seed administrator already present");
            return Ok(false);
        }

        self.users.save(User {
            id: 0,
            name: admin.username.clone(),
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash: hash_password(&admin.password)?,
            roles: [Role::Admin, Role::User].into_iter().collect(),
        })?;

        tracing::info!(username = %admin.username, "Seed administrator created");
        Ok(true)
    }
}

/// [`PrincipalLoader`] over the users table.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    db: Arc<BlogDatabase>,
}

impl UserDirectory {
    pub fn new(db: Arc<BlogDatabase>) -> Self {
        Self { db }
    }
}

impl PrincipalLoader for UserDirectory {
    fn load_by_username(&self, username: &str) -> Result<Principal, AuthError> {
        let user = UserRepository::new(&self.db)
            .find_by_username(username)
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or_else(|| AuthError::PrincipalNotFound(username.to_owned()))?;

        Ok(Principal::new(user.username, user.roles))
    }
}
