// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-operation authorization.
//!
//! Every routed request is mapped to an [`Operation`]; the [`AccessPolicy`]
//! table names the [`Requirement`] for that operation. The guard runs as a
//! route layer, after the authentication filter and before the handler, so
//! a rejected request never reaches business logic.
//!
//! | Requirement | Empty context | Principal without role | Principal with role |
//! |-------------|---------------|------------------------|---------------------|
//! | `Public` | allowed | allowed | allowed |
//! | `Authenticated` | 401 | allowed | allowed |
//! | `Role(r)` | 401 | 403 | allowed |

use std::collections::HashMap;

use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, Role, SecurityContext};
use crate::state::AppState;

/// Identifier of a dispatchable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListPosts,
    GetPost,
    CreatePost,
    UpdatePost,
    DeletePost,
    ListPostsByCategory,
    ListComments,
    GetComment,
    CreateComment,
    UpdateComment,
    DeleteComment,
    ListCategories,
    GetCategory,
    CreateCategory,
    UpdateCategory,
    DeleteCategory,
    Login,
    Register,
    CurrentUser,
    Health,
}

impl Operation {
    /// Map an HTTP method and matched route template to an operation.
    pub fn resolve(method: &Method, route: &str) -> Option<Operation> {
        use Operation::*;

        let op = match (method.as_str(), route) {
            ("GET", "/api/posts") => ListPosts,
            ("POST", "/api/posts") => CreatePost,
            ("GET", "/api/posts/{id}") => GetPost,
            ("PUT", "/api/posts/{id}") => UpdatePost,
            ("DELETE", "/api/posts/{id}") => DeletePost,
            ("GET", "/api/posts/category/{id}") => ListPostsByCategory,

            ("GET", "/api/v1/comments/posts/{post_id}/comments") => ListComments,
            ("POST", "/api/v1/comments/posts/{post_id}/comments") => CreateComment,
            ("GET", "/api/v1/comments/posts/{post_id}/comments/{comment_id}") => GetComment,
            ("PUT", "/api/v1/comments/posts/{post_id}/comments/{comment_id}") => UpdateComment,
            ("DELETE", "/api/v1/comments/posts/{post_id}/comments/{comment_id}") => DeleteComment,

            ("GET", "/api/v1/categories") => ListCategories,
            ("POST", "/api/v1/categories") => CreateCategory,
            ("GET", "/api/v1/categories/{id}") => GetCategory,
            ("PUT", "/api/v1/categories/{id}") => UpdateCategory,
            ("DELETE", "/api/v1/categories/{id}") => DeleteCategory,

            ("POST", "/api/auth/login" | "/api/auth/signin") => Login,
            ("POST", "/api/auth/register" | "/api/auth/signup") => Register,
            ("GET", "/api/users/me") => CurrentUser,
            ("GET", "/health" | "/health/live" | "/health/ready") => Health,
            _ => return None,
        };
        Some(op)
    }
}

/// What an operation demands of the security context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone, including anonymous requests
    Public,
    /// Any authenticated principal
    Authenticated,
    /// An authenticated principal holding the role
    Role(Role),
}

/// Operation → requirement table.
///
/// Operations absent from the table require authentication.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: HashMap<Operation, Requirement>,
}

impl AccessPolicy {
    /// A policy with no rules: everything requires authentication.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Set the requirement for one operation.
    pub fn with_rule(mut self, operation: Operation, requirement: Requirement) -> Self {
        self.rules.insert(operation, requirement);
        self
    }

    pub fn requirement(&self, operation: Operation) -> Requirement {
        self.rules
            .get(&operation)
            .copied()
            .unwrap_or(Requirement::Authenticated)
    }

    /// Check `context` against the requirement of `operation`.
    pub fn check(&self, context: &SecurityContext, operation: Operation) -> Result<(), AuthError> {
        check_requirement(context, self.requirement(operation))
    }
}

impl Default for AccessPolicy {
    /// Blog defaults: reading is public, writing content needs an account,
    /// managing posts and categories needs `ADMIN`.
    fn default() -> Self {
        use Operation::*;
        use Requirement::*;

        Self::empty()
            .with_rule(ListPosts, Public)
            .with_rule(GetPost, Public)
            .with_rule(ListPostsByCategory, Public)
            .with_rule(CreatePost, Role(super::Role::Admin))
            .with_rule(UpdatePost, Role(super::Role::Admin))
            .with_rule(DeletePost, Authenticated)
            .with_rule(ListComments, Public)
            .with_rule(GetComment, Public)
            .with_rule(CreateComment, Authenticated)
            .with_rule(UpdateComment, Authenticated)
            .with_rule(DeleteComment, Authenticated)
            .with_rule(ListCategories, Public)
            .with_rule(GetCategory, Public)
            .with_rule(CreateCategory, Role(super::Role::Admin))
            .with_rule(UpdateCategory, Role(super::Role::Admin))
            .with_rule(DeleteCategory, Role(super::Role::Admin))
            .with_rule(Login, Public)
            .with_rule(Register, Public)
            .with_rule(CurrentUser, Authenticated)
            .with_rule(Health, Public)
    }
}

/// Evaluate a single requirement against a context.
pub fn check_requirement(context: &SecurityContext, requirement: Requirement) -> Result<(), AuthError> {
    match requirement {
        Requirement::Public => Ok(()),
        Requirement::Authenticated => context
            .principal()
            .map(|_| ())
            .ok_or(AuthError::Unauthenticated),
        Requirement::Role(role) => {
            let principal = context.principal().ok_or(AuthError::Unauthenticated)?;
            if principal.has_role(role) {
                Ok(())
            } else {
                Err(AuthError::Forbidden)
            }
        }
    }
}

/// Authorization middleware. Install with `Router::route_layer` so the
/// matched route is known.
pub async fn authorize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let empty = SecurityContext::empty();
    let context = request
        .extensions()
        .get::<SecurityContext>()
        .unwrap_or(&empty);

    // Routes unknown to `Operation::resolve` require authentication
    let verdict = match Operation::resolve(request.method(), &route) {
        Some(operation) => state.policy.check(context, operation),
        None => check_requirement(context, Requirement::Authenticated),
    };

    if let Err(e) = verdict {
        tracing::debug!(
            method = %request.method(),
            route = %route,
            kind = e.kind(),
            "Request rejected by access policy"
        );
        return e.into_response();
    }

    next.run(request).await
}
