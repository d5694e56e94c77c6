// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blog REST API with JWT authentication.
//!
//! Posts, comments and categories over an embedded redb database, with
//! HMAC-signed bearer tokens and role-based access per operation.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Token codec, authentication filter, authorization guard
//! - `config` - Environment configuration
//! - `service` - Business rules for posts, comments, categories, accounts
//! - `storage` - Embedded database and repositories (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod state;
pub mod storage;
