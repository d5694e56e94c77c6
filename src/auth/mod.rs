// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! JWT authentication and role-based authorization for the blog API.
//!
//! ## Request Pipeline
//!
//! 1. Client sends `Authorization: Bearer <token>` (token from `/api/auth/login`)
//! 2. [`middleware::authenticate`] verifies the token with the [`TokenCodec`],
//!    loads the [`Principal`] through the [`PrincipalLoader`] and stores a
//!    [`SecurityContext`] in the request extensions. Failures leave the
//!    context empty; the request always continues.
//! 3. [`guard::authorize`] looks up the [`guard::Requirement`] of the routed
//!    [`guard::Operation`] and rejects with 401 (via [`entry_point`]) or 403.
//! 4. Handlers read the principal with the [`Auth`] extractor.
//!
//! ## Security
//!
//! - HMAC-SHA signed tokens, secret loaded once from configuration
//! - Strict expiry (`now < exp`), no clock-skew tolerance
//! - Principals are re-loaded on every request

pub mod context;
pub mod entry_point;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;

pub use context::{Authentication, RequestDetails, SecurityContext};
pub use error::AuthError;
pub use extractor::Auth;
pub use guard::{AccessPolicy, Operation, Requirement};
pub use principal::{Principal, PrincipalLoader};
pub use roles::Role;
pub use token::{KeyError, TokenCodec};
