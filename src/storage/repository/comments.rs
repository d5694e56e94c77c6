// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comment records.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EntityRepository, Post};
use crate::storage::{Entity, StorageResult, WriteScope};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
    /// Owning post
    pub post_id: u64,
}

impl Entity for Comment {
    const TABLE_NAME: &'static str = "comments";
    const RESOURCE: &'static str = "Comment";
    const SORTABLE: &'static [&'static str] = &["id", "name", "email", "body"];

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn compare_by(&self, other: &Self, property: &str) -> Option<Ordering> {
        match property {
            "id" => Some(self.id.cmp(&other.id)),
            "name" => Some(self.name.cmp(&other.name)),
            "email" => Some(self.email.cmp(&other.email)),
            "body" => Some(self.body.cmp(&other.body)),
            _ => None,
        }
    }
}

pub type CommentRepository<'a> = EntityRepository<'a, Comment>;

impl CommentRepository<'_> {
    pub fn find_by_post_id(&self, post_id: u64) -> StorageResult<Vec<Comment>> {
        self.find_where(|comment| comment.post_id == post_id)
    }

    /// Comments of several posts from a single scan, keyed by post id.
    pub fn group_by_post(&self, post_ids: &[u64]) -> StorageResult<BTreeMap<u64, Vec<Comment>>> {
        let mut grouped: BTreeMap<u64, Vec<Comment>> = BTreeMap::new();
        for comment in self.find_where(|comment| post_ids.contains(&comment.post_id))? {
            grouped.entry(comment.post_id).or_default().push(comment);
        }
        Ok(grouped)
    }

    /// Insert or replace a comment. Its post, and the comment itself when
    /// replacing, must still exist when the write commits.
    pub fn save_on_post(&self, comment: Comment) -> StorageResult<Comment> {
        self.db.write(|scope| {
            scope.require::<Post>(comment.post_id)?;
            if comment.id != 0 {
                scope.require::<Comment>(comment.id)?;
            }
            scope.insert(comment)
        })
    }
}

/// Delete every comment of the given posts inside an open write.
pub(super) fn remove_for_posts(scope: &WriteScope, post_ids: &[u64]) -> StorageResult<usize> {
    let ids: Vec<u64> = scope
        .scan(|comment: &Comment| post_ids.contains(&comment.post_id))?
        .into_iter()
        .map(|comment| comment.id)
        .collect();
    scope.remove::<Comment>(&ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BlogDatabase, Repository, StorageError};
    use tempfile::TempDir;

    fn comment(post_id: u64) -> Comment {
        Comment {
            id: 0,
            name: "Reader".into(),
            email: "reader@example.com".into(),
            body: "Nice article, thanks!".into(),
            post_id,
        }
    }

    #[test]
    fn groups_comments_by_post() {
        let dir = TempDir::new().unwrap();
        let db = BlogDatabase::open(&dir.path().join("blog.redb")).unwrap();
        let repo = CommentRepository::new(&db);

        for post_id in [1, 1, 2, 3] {
            repo.save(comment(post_id)).unwrap();
        }

        assert_eq!(repo.find_by_post_id(1).unwrap().len(), 2);

        let grouped = repo.group_by_post(&[1, 3, 4]).unwrap();
        assert_eq!(grouped[&1].len(), 2);
        assert_eq!(grouped[&3].len(), 1);
        assert!(!grouped.contains_key(&2));
        assert!(!grouped.contains_key(&4));
    }

    #[test]
    fn save_on_post_requires_the_post() {
        let dir = TempDir::new().unwrap();
        let db = BlogDatabase::open(&dir.path().join("blog.redb")).unwrap();
        let repo = CommentRepository::new(&db);

        assert!(matches!(
            repo.save_on_post(comment(1)),
            Err(StorageError::NotFound { resource: "Post", id: 1 })
        ));
        assert_eq!(db.count::<Comment>().unwrap(), 0);

        let post = db
            .store(Post {
                id: 0,
                title: "Hello".into(),
                description: "First post on the blog".into(),
                content: "Body".into(),
                category_id: 1,
            })
            .unwrap();
        let saved = repo.save_on_post(comment(post.id)).unwrap();
        assert_eq!(saved.post_id, post.id);
    }
}
