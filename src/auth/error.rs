// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::entry_point;
use crate::error::ErrorDetails;

/// Authentication and authorization failures.
///
/// Token and principal failures are distinguishable here for logging, but
/// the authentication filter swallows them: the request simply carries an
/// empty security context and the guard answers with `Unauthenticated`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Token is not a well-formed compact JWS
    #[error("Invalid JWT token")]
    MalformedToken,
    /// Signature does not match the configured secret
    #[error("Invalid JWT signature")]
    InvalidSignature,
    /// `exp` is not after the verification instant
    #[error("Expired JWT token")]
    ExpiredToken,
    /// Token uses an algorithm this server does not accept
    #[error("Unsupported JWT token")]
    UnsupportedToken,
    /// Token string or required claims are empty or absent
    #[error("JWT claims string is null or empty")]
    MissingClaims,
    /// Token subject does not resolve to a known user
    #[error("User not found with username or email: {0}")]
    PrincipalNotFound(String),
    /// No authenticated principal for a protected operation
    #[error("Full authentication is required to access this resource")]
    Unauthenticated,
    /// Authenticated principal lacks the required role
    #[error("Access Denied")]
    Forbidden,
    /// Token could not be signed
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable snake_case identifier, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::ExpiredToken => "expired_token",
            AuthError::UnsupportedToken => "unsupported_token",
            AuthError::MissingClaims => "missing_claims",
            AuthError::PrincipalNotFound(_) => "principal_not_found",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::Forbidden => "forbidden",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => entry_point::commence(&self.to_string()),
            status => {
                let body = Json(ErrorDetails::new(self.to_string(), self.kind()));
                (status, body).into_response()
            }
        }
    }
}
