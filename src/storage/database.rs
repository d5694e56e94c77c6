// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded blog database backed by redb.
//!
//! Every entity table maps a `u64` id to the entity serialized as JSON.
//! Ids come from the `sequences` table and start at 1; an entity with id 0
//! has never been stored. Unique secondary keys live in their own
//! `key → id` tables and are maintained in the same write transaction as
//! the record.

use std::cmp::Ordering;
use std::path::Path;

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

use super::repository::{Category, Comment, Post, User};
use super::{StorageError, StorageResult};

// =============================================================================
// Table Definitions
// =============================================================================

/// Sequence table: entity table name → last allocated id.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

fn table_of<T: Entity>() -> TableDefinition<'static, u64, &'static [u8]> {
    TableDefinition::new(T::TABLE_NAME)
}

fn index_table<T>(index: &UniqueIndex<T>) -> TableDefinition<'static, &'static str, u64> {
    TableDefinition::new(index.table)
}

/// A record stored in its own table.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Table (and sequence) name.
    const TABLE_NAME: &'static str;
    /// Name used in not-found messages.
    const RESOURCE: &'static str;
    /// Properties accepted by [`Entity::compare_by`].
    const SORTABLE: &'static [&'static str];
    /// Secondary keys that must be unique across the table, checked in order.
    const UNIQUE: &'static [UniqueIndex<Self>] = &[];

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);

    /// Order two records by a named property. `None` for unknown properties.
    fn compare_by(&self, other: &Self, property: &str) -> Option<Ordering>;
}

/// Unique secondary key of an entity, stored as `key → id`.
pub struct UniqueIndex<T> {
    /// Index table name
    pub table: &'static str,
    pub key: fn(&T) -> &str,
    /// Message reported when another record already holds the key
    pub conflict: &'static str,
}

fn read_record<T: Entity>(
    table: &impl ReadableTable<u64, &'static [u8]>,
    id: u64,
) -> StorageResult<Option<T>> {
    let Some(value) = table.get(id)? else {
        return Ok(None);
    };
    let record = serde_json::from_slice(value.value())?;
    Ok(Some(record))
}

fn collect_matching<T: Entity>(
    table: &impl ReadableTable<u64, &'static [u8]>,
    mut predicate: impl FnMut(&T) -> bool,
) -> StorageResult<Vec<T>> {
    let mut records = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        let record: T = serde_json::from_slice(value.value())?;
        if predicate(&record) {
            records.push(record);
        }
    }
    Ok(records)
}

fn create_tables<T: Entity>(txn: &WriteTransaction) -> StorageResult<()> {
    let _ = txn.open_table(table_of::<T>())?;
    for index in T::UNIQUE {
        let _ = txn.open_table(index_table(index))?;
    }
    Ok(())
}

// =============================================================================
// BlogDatabase
// =============================================================================

/// Embedded ACID blog database.
pub struct BlogDatabase {
    db: Database,
}

impl BlogDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SEQUENCES)?;
            create_tables::<Post>(&write_txn)?;
            create_tables::<Comment>(&write_txn)?;
            create_tables::<Category>(&write_txn)?;
            create_tables::<User>(&write_txn)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Opened blog database");
        Ok(Self { db })
    }

    /// Run `op` in one write transaction. Commits when `op` succeeds and
    /// aborts otherwise, so every change `op` made is kept or none is.
    ///
    /// redb serializes write transactions: reads done through the scope see
    /// exactly the state the writes are applied to.
    pub fn write<R>(&self, op: impl FnOnce(&WriteScope) -> StorageResult<R>) -> StorageResult<R> {
        let scope = WriteScope {
            txn: self.db.begin_write()?,
        };
        match op(&scope) {
            Ok(value) => {
                scope.txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                scope.txn.abort()?;
                Err(e)
            }
        }
    }

    /// Insert or replace a record. A record with id 0 gets the next id from
    /// its sequence; the stored record is returned.
    pub fn store<T: Entity>(&self, entity: T) -> StorageResult<T> {
        self.write(|scope| scope.insert(entity))
    }

    /// Look up a record by id.
    pub fn load<T: Entity>(&self, id: u64) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_of::<T>())?;
        read_record(&table, id)
    }

    /// Look up a record through one of its unique keys.
    pub fn find_unique<T: Entity>(
        &self,
        index: &UniqueIndex<T>,
        key: &str,
    ) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let ids = read_txn.open_table(index_table(index))?;
        let Some(id) = ids.get(key)?.map(|id| id.value()) else {
            return Ok(None);
        };
        let table = read_txn.open_table(table_of::<T>())?;
        read_record(&table, id)
    }

    /// Every record of a table matching `predicate`, in id order.
    pub fn scan<T: Entity>(&self, predicate: impl FnMut(&T) -> bool) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_of::<T>())?;
        collect_matching(&table, predicate)
    }

    /// Delete records by id in one transaction. Returns how many existed.
    pub fn remove<T: Entity>(&self, ids: &[u64]) -> StorageResult<usize> {
        self.write(|scope| scope.remove::<T>(ids))
    }

    /// Number of records in a table.
    pub fn count<T: Entity>(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_of::<T>())?;
        Ok(table.len()?)
    }
}

impl std::fmt::Debug for BlogDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogDatabase").finish_non_exhaustive()
    }
}

// =============================================================================
// WriteScope
// =============================================================================

/// Reads and writes inside one open write transaction. See
/// [`BlogDatabase::write`].
pub struct WriteScope {
    txn: WriteTransaction,
}

impl WriteScope {
    pub fn get<T: Entity>(&self, id: u64) -> StorageResult<Option<T>> {
        let table = self.txn.open_table(table_of::<T>())?;
        read_record(&table, id)
    }

    /// Like [`WriteScope::get`], failing with [`StorageError::NotFound`].
    pub fn require<T: Entity>(&self, id: u64) -> StorageResult<T> {
        self.get(id)?.ok_or(StorageError::NotFound {
            resource: T::RESOURCE,
            id,
        })
    }

    pub fn scan<T: Entity>(&self, predicate: impl FnMut(&T) -> bool) -> StorageResult<Vec<T>> {
        let table = self.txn.open_table(table_of::<T>())?;
        collect_matching(&table, predicate)
    }

    /// Insert or replace a record, allocating an id for id 0 and keeping
    /// the unique indexes in step. Fails with [`StorageError::Duplicate`]
    /// when another record holds one of its unique keys.
    pub fn insert<T: Entity>(&self, mut entity: T) -> StorageResult<T> {
        let previous: Option<T> = if entity.id() == 0 {
            let mut sequences = self.txn.open_table(SEQUENCES)?;
            let next = sequences
                .get(T::TABLE_NAME)?
                .map(|last| last.value())
                .unwrap_or(0)
                + 1;
            sequences.insert(T::TABLE_NAME, next)?;
            entity.set_id(next);
            None
        } else {
            self.get(entity.id())?
        };

        for index in T::UNIQUE {
            let key = (index.key)(&entity);
            let mut ids = self.txn.open_table(index_table(index))?;
            let owner = ids.get(key)?.map(|id| id.value());
            if owner.is_some_and(|owner| owner != entity.id()) {
                return Err(StorageError::Duplicate(index.conflict));
            }
            if let Some(old_key) = previous.as_ref().map(|old| (index.key)(old)) {
                if old_key != key {
                    ids.remove(old_key)?;
                }
            }
            ids.insert(key, entity.id())?;
        }

        let json = serde_json::to_vec(&entity)?;
        let mut table = self.txn.open_table(table_of::<T>())?;
        table.insert(entity.id(), json.as_slice())?;
        Ok(entity)
    }

    /// Delete records by id along with their index entries. Returns how
    /// many existed.
    pub fn remove<T: Entity>(&self, ids: &[u64]) -> StorageResult<usize> {
        let mut table = self.txn.open_table(table_of::<T>())?;
        let mut removed = 0;
        for id in ids {
            let Some(json) = table.remove(*id)?.map(|value| value.value().to_vec()) else {
                continue;
            };
            removed += 1;

            if T::UNIQUE.is_empty() {
                continue;
            }
            let record: T = serde_json::from_slice(&json)?;
            for index in T::UNIQUE {
                let mut keys = self.txn.open_table(index_table(index))?;
                keys.remove((index.key)(&record))?;
            }
        }
        Ok(removed)
    }
}
