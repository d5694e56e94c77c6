// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication filter for Axum.
//!
//! Runs once per request, ahead of routing:
//!
//! 1. Reads the `Authorization` header. A `Bearer ` prefix is stripped; any
//!    other value is tried as a token as-is.
//! 2. Verifies the token and loads the principal named by its subject.
//! 3. Stores a [`SecurityContext`] in the request extensions - populated on
//!    success, empty otherwise.
//!
//! The filter never rejects a request. Whether an anonymous request may
//! proceed is decided by the guard in [`super::guard`].

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use super::{AuthError, PrincipalLoader, RequestDetails, SecurityContext, TokenCodec};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Authentication middleware function.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/api/posts", get(list_posts))
///     .layer(axum::middleware::from_fn_with_state(state.clone(), authenticate));
/// ```
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers());
    let details = request_details(&request);
    let context = establish_context(
        &state.tokens,
        state.principals.as_ref(),
        token.as_deref(),
        details,
    );

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Extract the credential from the `Authorization` header.
///
/// Returns the text after `Bearer ` when the prefix is present, the raw
/// header value otherwise, and `None` for a missing, blank or non-UTF-8
/// header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    if value.trim().is_empty() {
        return None;
    }
    let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(value);
    Some(token.to_owned())
}

/// Build the security context for a presented token.
///
/// Every failure - codec or principal lookup - yields an empty context.
pub fn establish_context(
    tokens: &TokenCodec,
    principals: &dyn PrincipalLoader,
    token: Option<&str>,
    details: RequestDetails,
) -> SecurityContext {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        return SecurityContext::empty();
    };

    let principal = tokens
        .verify(token)
        .and_then(|username| principals.load_by_username(&username));

    match principal {
        Ok(principal) => {
            tracing::debug!(
                username = %principal.username,
                request_id = details.request_id.as_deref().unwrap_or("-"),
                "Request authenticated"
            );
            SecurityContext::authenticated(principal, details)
        }
        Err(e @ AuthError::Internal(_)) => {
            tracing::warn!(
                error = %e,
                request_id = details.request_id.as_deref().unwrap_or("-"),
                "Principal lookup failed, continuing anonymously"
            );
            SecurityContext::empty()
        }
        Err(e) => {
            tracing::debug!(
                kind = e.kind(),
                error = %e,
                request_id = details.request_id.as_deref().unwrap_or("-"),
                "Credential rejected, continuing anonymously"
            );
            SecurityContext::empty()
        }
    }
}

fn request_details(request: &Request) -> RequestDetails {
    RequestDetails {
        remote_addr: request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr),
        request_id: request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    }
}
