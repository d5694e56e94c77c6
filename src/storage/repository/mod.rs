// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the blog database.
//!
//! [`Repository`] is the capability services depend on; [`EntityRepository`]
//! implements it for every [`Entity`] and gains entity-specific finders in
//! the per-entity modules.

use std::marker::PhantomData;

use super::{BlogDatabase, Entity, Page, PageRequest, StorageResult};

pub mod categories;
pub mod comments;
pub mod posts;
pub mod users;

pub use categories::{Category, CategoryRemoval, CategoryRepository};
pub use comments::{Comment, CommentRepository};
pub use posts::{Post, PostRepository};
pub use users::{User, UserRepository};

/// Basic persistence operations over one entity type.
pub trait Repository<T: Entity> {
    /// Insert (id 0) or replace a record; returns it with its id.
    fn save(&self, entity: T) -> StorageResult<T>;

    fn find_by_id(&self, id: u64) -> StorageResult<Option<T>>;

    fn find_all(&self, request: &PageRequest) -> StorageResult<Page<T>>;

    /// Returns `false` when no record had that id.
    fn delete(&self, id: u64) -> StorageResult<bool>;
}

/// Repository for any entity stored in the [`BlogDatabase`].
pub struct EntityRepository<'a, T> {
    db: &'a BlogDatabase,
    _entity: PhantomData<T>,
}

impl<'a, T: Entity> EntityRepository<'a, T> {
    pub fn new(db: &'a BlogDatabase) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Every record matching `predicate`, in id order.
    pub fn find_where(&self, predicate: impl FnMut(&T) -> bool) -> StorageResult<Vec<T>> {
        self.db.scan(predicate)
    }

    pub fn exists(&self, id: u64) -> StorageResult<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }
}

impl<T: Entity> Repository<T> for EntityRepository<'_, T> {
    fn save(&self, entity: T) -> StorageResult<T> {
        self.db.store(entity)
    }

    fn find_by_id(&self, id: u64) -> StorageResult<Option<T>> {
        self.db.load(id)
    }

    fn find_all(&self, request: &PageRequest) -> StorageResult<Page<T>> {
        let records = self.db.scan(|_: &T| true)?;
        request.apply(records)
    }

    fn delete(&self, id: u64) -> StorageResult<bool> {
        Ok(self.db.remove::<T>(&[id])? == 1)
    }
}
