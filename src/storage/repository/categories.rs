// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Category records.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{comments, EntityRepository, Post};
use crate::storage::{Entity, StorageResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub description: String,
}

impl Entity for Category {
    const TABLE_NAME: &'static str = "categories";
    const RESOURCE: &'static str = "Category";
    const SORTABLE: &'static [&'static str] = &["id", "name", "description"];

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
            "description" => Some(self.description.cmp(&other.description)),
            _ => None,
        }
    }
}

pub type CategoryRepository<'a> = EntityRepository<'a, Category>;

/// Rows removed by [`CategoryRepository::delete_cascade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRemoval {
    pub posts: usize,
    pub comments: usize,
}

impl CategoryRemoval {
    /// Rows across all three tables, the category included.
    pub fn total(&self) -> usize {
        self.comments + self.posts + 1
    }
}

impl CategoryRepository<'_> {
    /// Delete a category, its posts and their comments in one transaction.
    pub fn delete_cascade(&self, id: u64) -> StorageResult<CategoryRemoval> {
        self.db.write(|scope| {
            scope.require::<Category>(id)?;

            let post_ids: Vec<u64> = scope
                .scan(|post: &Post| post.category_id == id)?
                .into_iter()
                .map(|post| post.id)
                .collect();

            let comments = comments::remove_for_posts(scope, &post_ids)?;
            let posts = scope.remove::<Post>(&post_ids)?;
            scope.remove::<Category>(&[id])?;
            Ok(CategoryRemoval { posts, comments })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{
        BlogDatabase, Comment, CommentRepository, PageRequest, PostRepository, Repository,
        SortDirection, StorageError,
    };
    use tempfile::TempDir;

    #[test]
    fn crud_roundtrip() {
        let dir = TempDir::new().unwrap();
        let db = BlogDatabase::open(&dir.path().join("blog.redb")).unwrap();
        let repo = CategoryRepository::new(&db);

        let saved = repo
            .save(Category {
                id: 0,
                name: "Rust".into(),
                description: "Systems programming".into(),
            })
            .unwrap();
        assert!(repo.exists(saved.id).unwrap());

        let page = repo
            .find_all(&PageRequest::new(0, 10, "name", SortDirection::Ascending))
            .unwrap();
        assert_eq!(page.content, vec![saved.clone()]);

        assert!(repo.delete(saved.id).unwrap());
        assert!(!repo.delete(saved.id).unwrap());
        assert!(repo.find_by_id(saved.id).unwrap().is_none());
    }

    #[test]
    fn delete_cascade_removes_posts_and_comments() {
        let dir = TempDir::new().unwrap();
        let db = BlogDatabase::open(&dir.path().join("blog.redb")).unwrap();
        let categories = CategoryRepository::new(&db);
        let posts = PostRepository::new(&db);
        let comments = CommentRepository::new(&db);

        let category = categories
            .save(Category {
                id: 0,
                name: "Go".into(),
                description: "Gophers".into(),
            })
            .unwrap();
        let post = posts
            .save_in_category(Post {
                id: 0,
                title: "Channels".into(),
                description: "Talking between goroutines".into(),
                content: "Content".into(),
                category_id: category.id,
            })
            .unwrap();
        for _ in 0..2 {
            comments
                .save_on_post(Comment {
                    id: 0,
                    name: "Reader".into(),
                    email: "reader@example.com".into(),
                    body: "Thanks for the write-up".into(),
                    post_id: post.id,
                })
                .unwrap();
        }

        let removal = categories.delete_cascade(category.id).unwrap();
        assert_eq!(removal, CategoryRemoval { posts: 1, comments: 2 });
        assert_eq!(removal.total(), 4);
        assert_eq!(db.count::<Post>().unwrap(), 0);
        assert_eq!(db.count::<Comment>().unwrap(), 0);

        assert!(matches!(
            categories.delete_cascade(category.id),
            Err(StorageError::NotFound { resource: "Category", .. })
        ));
    }
}
