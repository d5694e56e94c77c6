// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Blog Services
//!
//! Business rules between the HTTP handlers and the repositories. Each
//! service borrows the [`BlogDatabase`](crate::storage::BlogDatabase) for
//! the duration of one request and reports failures as
//! [`ApiError`](crate::error::ApiError).
//!
//! - [`PostService`] - posts, paging, cascade delete of comments
//! - [`CommentService`] - comments scoped to their post
//! - [`CategoryService`] - categories, cascade delete of posts
//! - [`AccountService`] - registration, login, seeded administrator
//! - [`UserDirectory`] - principal lookup for the authentication filter

pub mod accounts;
pub mod categories;
pub mod comments;
pub mod posts;

pub use accounts::{AccountService, SeedAdmin, UserDirectory};
pub use categories::CategoryService;
pub use comments::CommentService;
pub use posts::PostService;
