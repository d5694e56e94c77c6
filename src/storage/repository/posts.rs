// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post records.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{comments, Category, EntityRepository};
use crate::storage::{Entity, StorageResult};

/// A blog post. Every post belongs to exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub content: String,
    pub category_id: u64,
}

impl Entity for Post {
    const TABLE_NAME: &'static str = "posts";
    const RESOURCE: &'static str = "Post";
    const SORTABLE: &'static [&'static str] = &["id", "title", "description", "content"];

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn compare_by(&self, other: &Self, property: &str) -> Option<Ordering> {
        match property {
            "id" => Some(self.id.cmp(&other.id)),
            "title" => Some(self.title.cmp(&other.title)),
            "description" => Some(self.description.cmp(&other.description)),
            "content" => Some(self.content.cmp(&other.content)),
            _ => None,
        }
    }
}

pub type PostRepository<'a> = EntityRepository<'a, Post>;

impl PostRepository<'_> {
    /// Posts filed under a category, in id order.
    pub fn find_by_category(&self, category_id: u64) -> StorageResult<Vec<Post>> {
        self.find_where(|post| post.category_id == category_id)
    }

    /// Insert or replace a post. Its category, and the post itself when
    /// replacing, must still exist when the write commits.
    pub fn save_in_category(&self, post: Post) -> StorageResult<Post> {
        self.db.write(|scope| {
            if post.id != 0 {
                scope.require::<Post>(post.id)?;
            }
            scope.require::<Category>(post.category_id)?;
            scope.insert(post)
        })
    }

    /// Delete a post and its comments in one transaction. Returns the number
    /// of comments removed.
    pub fn delete_with_comments(&self, id: u64) -> StorageResult<usize> {
        self.db.write(|scope| {
            scope.require::<Post>(id)?;
            let comments = comments::remove_for_posts(scope, &[id])?;
            scope.remove::<Post>(&[id])?;
            Ok(comments)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BlogDatabase, Comment, CommentRepository, Repository, StorageError};
    use tempfile::TempDir;

    fn open() -> (TempDir, BlogDatabase) {
        let dir = TempDir::new().unwrap();
        let db = BlogDatabase::open(&dir.path().join("blog.redb")).unwrap();
        (dir, db)
    }

    fn post(title: &str, category_id: u64) -> Post {
        Post {
            id: 0,
            title: title.into(),
            description: "A description long enough".into(),
            content: "Content".into(),
            category_id,
        }
    }

    #[test]
    fn find_by_category_filters() {
        let (_dir, db) = open();
        let repo = PostRepository::new(&db);

        repo.save(post("one", 1)).unwrap();
        repo.save(post("two", 2)).unwrap();
        repo.save(post("three", 1)).unwrap();

        let titles: Vec<_> = repo
            .find_by_category(1)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["one", "three"]);
        assert!(repo.find_by_category(3).unwrap().is_empty());
    }

    #[test]
    fn save_in_category_checks_parent_in_same_write() {
        let (_dir, db) = open();
        let repo = PostRepository::new(&db);

        let err = repo.save_in_category(post("orphan", 7)).unwrap_err();
        assert!(matches!(
            err,
            StorageError::NotFound { resource: "Category", id: 7 }
        ));
        assert_eq!(db.count::<Post>().unwrap(), 0);

        let category = db
            .store(Category {
                id: 0,
                name: "Rust".into(),
                description: "Systems".into(),
            })
            .unwrap();
        let saved = repo.save_in_category(post("first", category.id)).unwrap();
        // The aborted write did not consume an id
        assert_eq!(saved.id, 1);

        repo.delete(saved.id).unwrap();
        let mut stale = saved.clone();
        stale.title = "resurrected".into();
        assert!(matches!(
            repo.save_in_category(stale),
            Err(StorageError::NotFound { resource: "Post", .. })
        ));
    }

    #[test]
    fn delete_with_comments_keeps_other_posts_comments() {
        let (_dir, db) = open();
        let repo = PostRepository::new(&db);
        let comments = CommentRepository::new(&db);
        let doomed = repo.save(post("doomed", 1)).unwrap();
        let kept = repo.save(post("kept", 1)).unwrap();
        for post_id in [doomed.id, doomed.id, kept.id] {
            comments
                .save(Comment {
                    id: 0,
                    name: "Reader".into(),
                    email: "reader@example.com".into(),
                    body: "Nice one".into(),
                    post_id,
                })
                .unwrap();
        }

        assert_eq!(repo.delete_with_comments(doomed.id).unwrap(), 2);
        assert!(repo.find_by_id(doomed.id).unwrap().is_none());
        assert_eq!(comments.find_by_post_id(kept.id).unwrap().len(), 1);
        assert!(matches!(
            repo.delete_with_comments(doomed.id),
            Err(StorageError::NotFound { resource: "Post", .. })
        ));
    }
}
