// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comment operations. Every comment is addressed through its post.

use crate::error::ApiError;
use crate::models::CommentDto;
use crate::storage::{BlogDatabase, Comment, CommentRepository, PostRepository, Repository};

pub struct CommentService<'a> {
    comments: CommentRepository<'a>,
    posts: PostRepository<'a>,
}

impl<'a> CommentService<'a> {
    pub fn new(db: &'a BlogDatabase) -> Self {
        Self {
            comments: CommentRepository::new(db),
            posts: PostRepository::new(db),
        }
    }

    pub fn create(&self, post_id: u64, dto: CommentDto) -> Result<CommentDto, ApiError> {
        let comment = self.comments.save_on_post(Comment {
            id: 0,
            name: dto.name,
            email: dto.email,
            body: dto.body,
            post_id,
        })?;

        tracing::info!(post_id, comment_id = comment.id, "Comment created");
        Ok(comment.into())
    }

    pub fn list_by_post(&self, post_id: u64) -> Result<Vec<CommentDto>, ApiError> {
        Ok(self
            .comments
            .find_by_post_id(post_id)?
            .into_iter()
            .map(CommentDto::from)
            .collect())
    }

    pub fn get(&self, post_id: u64, comment_id: u64) -> Result<CommentDto, ApiError> {
        self.find_on_post(post_id, comment_id).map(CommentDto::from)
    }

    pub fn update(
        &self,
        post_id: u64,
        comment_id: u64,
        dto: CommentDto,
    ) -> Result<CommentDto, ApiError> {
        let mut comment = self.find_on_post(post_id, comment_id)?;
        comment.name = dto.name;
        comment.email = dto.email;
        comment.body = dto.body;

        let comment = self.comments.save_on_post(comment)?;
        tracing::info!(post_id, comment_id, "Comment updated");
        Ok(comment.into())
    }

    pub fn delete(&self, post_id: u64, comment_id: u64) -> Result<(), ApiError> {
        let comment = self.find_on_post(post_id, comment_id)?;
        self.comments.delete(comment.id)?;
        tracing::info!(post_id, comment_id, "Comment deleted");
        Ok(())
    }

    /// Load a comment and check it belongs to the post.
    fn find_on_post(&self, post_id: u64, comment_id: u64) -> Result<Comment, ApiError> {
        if !self.posts.exists(post_id)? {
            return Err(ApiError::resource_not_found("Post", "id", post_id));
        }

        let comment = self
            .comments
            .find_by_id(comment_id)?
            .ok_or_else(|| ApiError::resource_not_found("Comment", "id", comment_id))?;

        if comment.post_id != post_id {
            return Err(ApiError::bad_request("Comment does not belong to post"));
        }
        Ok(comment)
    }
}
