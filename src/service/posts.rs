// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post operations.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{PostDto, PostResponse};
use crate::storage::{
    BlogDatabase, CategoryRepository, Comment, CommentRepository, PageRequest, Post,
    PostRepository, Repository,
};

pub struct PostService<'a> {
    posts: PostRepository<'a>,
    comments: CommentRepository<'a>,
    categories: CategoryRepository<'a>,
}

impl<'a> PostService<'a> {
    pub fn new(db: &'a BlogDatabase) -> Self {
        Self {
            posts: PostRepository::new(db),
            comments: CommentRepository::new(db),
            categories: CategoryRepository::new(db),
        }
    }

    /// Create a post under an existing category.
    pub fn create(&self, dto: PostDto) -> Result<PostDto, ApiError> {
        let post = self.posts.save_in_category(Post {
            id: 0,
            title: dto.title,
            description: dto.description,
            content: dto.content,
            category_id: required_category(dto.category_id)?,
        })?;

        tracing::info!(post_id = post.id, category_id = post.category_id, "Post created");
        Ok(PostDto::from_post(post, Vec::new()))
    }

    pub fn list(&self, request: &PageRequest) -> Result<PostResponse, ApiError> {
        let page = self.posts.find_all(request)?;
        let mut comments = self.comments_of(&page.content)?;
        Ok(page.map(|post| attach(post, &mut comments)))
    }

    pub fn get(&self, id: u64) -> Result<PostDto, ApiError> {
        let post = self.find(id)?;
        let comments = self.comments.find_by_post_id(post.id)?;
        Ok(PostDto::from_post(post, comments))
    }

    /// Replace title, description, content and category of a post.
    pub fn update(&self, id: u64, dto: PostDto) -> Result<PostDto, ApiError> {
        let mut post = self.find(id)?;
        post.title = dto.title;
        post.description = dto.description;
        post.content = dto.content;
        post.category_id = required_category(dto.category_id)?;

        let post = self.posts.save_in_category(post)?;
        tracing::info!(post_id = post.id, "Post updated");
        let comments = self.comments.find_by_post_id(post.id)?;
        Ok(PostDto::from_post(post, comments))
    }

    /// Delete a post together with its comments.
    pub fn delete(&self, id: u64) -> Result<(), ApiError> {
        let comments = self.posts.delete_with_comments(id)?;
        tracing::info!(post_id = id, comments, "Post deleted");
        Ok(())
    }

    pub fn list_by_category(&self, category_id: u64) -> Result<Vec<PostDto>, ApiError> {
        if !self.categories.exists(category_id)? {
            return Err(ApiError::resource_not_found("Category", "id", category_id));
        }
        let posts = self.posts.find_by_category(category_id)?;
        let mut comments = self.comments_of(&posts)?;
        Ok(posts
            .into_iter()
            .map(|post| attach(post, &mut comments))
            .collect())
    }

    fn find(&self, id: u64) -> Result<Post, ApiError> {
        self.posts
            .find_by_id(id)?
            .ok_or_else(|| ApiError::resource_not_found("Post", "id", id))
    }

    fn comments_of(&self, posts: &[Post]) -> Result<BTreeMap<u64, Vec<Comment>>, ApiError> {
        let ids: Vec<u64> = posts.iter().map(|post| post.id).collect();
        Ok(self.comments.group_by_post(&ids)?)
    }
}

fn required_category(category_id: Option<u64>) -> Result<u64, ApiError> {
    category_id.ok_or_else(|| ApiError::bad_request("Category id is required"))
}

fn attach(post: Post, comments: &mut BTreeMap<u64, Vec<Comment>>) -> PostDto {
    let own = comments.remove(&post.id).unwrap_or_default();
    PostDto::from_post(post, own)
}
