// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors reading the request's [`SecurityContext`].
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is the authenticated Principal
//! }
//! ```

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Principal, SecurityContext};

/// The current request's security context (empty when the filter did not
/// run or did not authenticate).
impl<S> FromRequestParts<S> for SecurityContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Extractor for the authenticated principal.
///
/// Rejects with [`AuthError::Unauthenticated`] (401 through the entry
/// point) when the context is empty.
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(context) = SecurityContext::from_request_parts(parts, state).await;
        context
            .principal()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}
