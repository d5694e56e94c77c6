// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for the blog in an embedded **redb** database
//! (pure Rust, ACID). One file holds every table:
//!
//! ```text
//! blog.redb
//!   posts        id → Post (JSON)
//!   comments     id → Comment (JSON)
//!   categories   id → Category (JSON)
//!   users        id → User (JSON)
//!   users_by_username  username → user id
//!   users_by_email     e-mail → user id
//!   sequences    table name → last allocated id
//! ```
//!
//! Writes that span several tables (cascading deletes, inserts that depend
//! on a parent record, unique keys) run inside one
//! [`BlogDatabase::write`] transaction.
//!
//! Services talk to the tables through the [`Repository`] capability trait;
//! [`EntityRepository`] is its redb adapter.

pub mod database;
pub mod page;
pub mod repository;

pub use database::{BlogDatabase, Entity, UniqueIndex, WriteScope};
pub use page::{Page, PageRequest, SortDirection};
pub use repository::{
    Category, CategoryRemoval, CategoryRepository, Comment, CommentRepository, EntityRepository,
    Post, PostRepository, Repository, User, UserRepository,
};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown sort property: {0}")]
    InvalidSortField(String),

    #[error("invalid page request: {0}")]
    InvalidPage(String),

    #[error("{resource} {id} does not exist")]
    NotFound { resource: &'static str, id: u64 },

    /// A unique key is already held by another record
    #[error("{0}")]
    Duplicate(&'static str),
}

pub type StorageResult<T> = Result<T, StorageError>;
