// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::AuthError;
use crate::storage::StorageError;

/// Error returned by handlers and services.
///
/// Renders as [`ErrorDetails`], or as a `{field: message}` map when it
/// carries field errors from request validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub field_errors: Option<BTreeMap<String, String>>,
}

/// JSON error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetails {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub details: String,
}

impl ErrorDetails {
    pub fn new(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            details: details.into(),
        }
    }
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// 404 in the form `Post not found with id : '7'`.
    pub fn resource_not_found(resource: &str, field: &str, value: impl std::fmt::Display) -> Self {
        Self::not_found(format!("{resource} not found with {field} : '{value}'"))
    }

    /// 400 carrying per-field validation messages.
    pub fn validation(field_errors: BTreeMap<String, String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_string(),
            field_errors: Some(field_errors),
        }
    }

    fn details(&self) -> &'static str {
        match self.status {
            StatusCode::BAD_REQUEST => "bad_request",
            StatusCode::UNAUTHORIZED => "unauthorized",
            StatusCode::FORBIDDEN => "forbidden",
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::INTERNAL_SERVER_ERROR => "internal_error",
            _ => "error",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(fields) = self.field_errors {
            return (self.status, Json(fields)).into_response();
        }
        let body = Json(ErrorDetails::new(self.message.clone(), self.details()));
        (self.status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidSortField(field) => {
                Self::bad_request(format!("Cannot sort by unknown property '{field}'"))
            }
            StorageError::InvalidPage(reason) => Self::bad_request(reason),
            StorageError::NotFound { resource, id } => Self::resource_not_found(resource, "id", id),
            StorageError::Duplicate(conflict) => Self::bad_request(conflict),
            other => {
                tracing::error!(error = %other, "Storage operation failed");
                Self::internal("Internal storage error")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(reason) => {
                tracing::error!(error = %reason, "Authentication backend failure");
                Self::internal("Internal server error")
            }
            other => Self::new(other.status_code(), other.to_string()),
        }
    }
}
