// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped security context.
//!
//! The authentication filter builds exactly one [`SecurityContext`] per
//! request and stores it in the request extensions. The guard and the
//! handler extractors read it from there; nothing is kept in globals or
//! thread-locals, and a context never outlives its request.

use std::net::SocketAddr;

use super::Principal;

/// Request metadata recorded alongside an authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDetails {
    /// Peer address, when the server was started with connect info
    pub remote_addr: Option<SocketAddr>,
    /// Value of the `x-request-id` header
    pub request_id: Option<String>,
}

/// A principal established for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    pub principal: Principal,
    pub details: RequestDetails,
}

/// Holder of the current request's authentication, if any.
///
/// Either empty or fully populated; there is no way to mutate it after
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    authentication: Option<Authentication>,
}

impl SecurityContext {
    /// Context of an anonymous request.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context of a request whose credential resolved to `principal`.
    pub fn authenticated(principal: Principal, details: RequestDetails) -> Self {
        Self {
            authentication: Some(Authentication { principal, details }),
        }
    }

    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.authentication.as_ref().map(|a| &a.principal)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication.is_some()
    }
}
