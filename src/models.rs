// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. JSON field names are
//! camelCase.
//!
//! ## Validation
//!
//! Request bodies implement [`Validate`]; handlers call it before the
//! service. Missing string fields deserialize as empty strings so that they
//! surface as field errors (`{"title": "Title cannot be empty"}`) rather than
//! as body parse failures.
//!
//! ## Model Categories
//!
//! - **Posts**: [`PostDto`], [`PostResponse`]
//! - **Comments**: [`CommentDto`]
//! - **Categories**: [`CategoryDto`]
//! - **Accounts**: [`LoginDto`], [`JwtAuthResponse`], [`RegisterDto`], [`CurrentUser`]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::auth::Principal;
use crate::error::ApiError;
use crate::storage::{Category, Comment, Page, Post};

/// Field name → first violated constraint.
pub type FieldErrors = BTreeMap<String, String>;

/// Request-body constraints.
pub trait Validate {
    fn field_errors(&self) -> FieldErrors;

    fn validate(&self) -> Result<(), ApiError> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(errors))
        }
    }
}

/// Collects the first failure per field.
#[derive(Default)]
struct Checker {
    errors: FieldErrors,
}

impl Checker {
    fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok && !self.errors.contains_key(field) {
            self.errors.insert(field.to_string(), message.to_string());
        }
        self
    }

    fn finish(&mut self) -> FieldErrors {
        std::mem::take(&mut self.errors)
    }
}

fn min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

/// Loose e-mail shape check: `local@domain`, no whitespace, one `@`.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

// =============================================================================
// Posts
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PostDto {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub content: String,
    pub comments: Vec<CommentDto>,
    pub category_id: Option<u64>,
}

impl PostDto {
    pub fn from_post(post: Post, comments: Vec<Comment>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            content: post.content,
            comments: comments.into_iter().map(CommentDto::from).collect(),
            category_id: Some(post.category_id),
        }
    }
}

impl Validate for PostDto {
    fn field_errors(&self) -> FieldErrors {
        Checker::default()
            .check("title", !self.title.is_empty(), "Title cannot be empty")
            .check("title", min_chars(&self.title, 2), "Title must have at least 2 characters")
            .check("description", !self.description.is_empty(), "Description cannot be empty")
            .check(
                "description",
                min_chars(&self.description, 10),
                "Description must have at least 10 characters",
            )
            .check("content", !self.content.is_empty(), "Content cannot be empty")
            .check("categoryId", self.category_id.is_some(), "Category id is required")
            .finish()
    }
}

/// One page of posts.
pub type PostResponse = Page<PostDto>;

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentDto {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            name: comment.name,
            email: comment.email,
            body: comment.body,
        }
    }
}

impl Validate for CommentDto {
    fn field_errors(&self) -> FieldErrors {
        Checker::default()
            .check("name", !self.name.is_empty(), "Name cannot be empty")
            .check("email", !self.email.is_empty(), "Email cannot be empty")
            .check("email", is_valid_email(&self.email), "Email should be valid")
            .check("body", !self.body.is_empty(), "Body cannot be empty")
            .check("body", min_chars(&self.body, 10), "Body must have at least 10 characters")
            .finish()
    }
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryDto {
    pub id: u64,
    pub name: String,
    pub description: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginDto {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JwtAuthResponse {
    pub access_token: String,
    pub token_type: String,
}

impl JwtAuthResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterDto {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterDto {
    fn field_errors(&self) -> FieldErrors {
        Checker::default()
            .check("name", !self.name.trim().is_empty(), "Name cannot be empty")
            .check("username", !self.username.trim().is_empty(), "Username cannot be empty")
            .check("email", !self.email.is_empty(), "Email cannot be empty")
            .check("email", is_valid_email(&self.email), "Email should be valid")
            .check("password", !self.password.is_empty(), "Password cannot be empty")
            .finish()
    }
}

/// The caller's identity as seen by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
    pub roles: Vec<String>,
}

impl From<Principal> for CurrentUser {
    fn from(principal: Principal) -> Self {
        Self {
            roles: principal.roles.iter().map(ToString::to_string).collect(),
            username: principal.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::http::StatusCode;

    fn valid_post() -> PostDto {
        PostDto {
            title: "Hi".into(),
            description: "Ten chars!".into(),
            content: "x".into(),
            category_id: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn valid_post_passes() {
        assert!(valid_post().validate().is_ok());
    }

    #[test]
    fn post_constraints() {
        let dto = PostDto {
            title: "H".into(),
            description: "short".into(),
            content: String::new(),
            category_id: None,
            ..Default::default()
        };
        let errors = dto.field_errors();
        assert_eq!(errors["title"], "Title must have at least 2 characters");
        assert_eq!(errors["description"], "Description must have at least 10 characters");
        assert_eq!(errors["content"], "Content cannot be empty");
        assert_eq!(errors["categoryId"], "Category id is required");
    }

    #[test]
    fn empty_field_reports_emptiness_first() {
        let dto = PostDto {
            title: String::new(),
            ..valid_post()
        };
        assert_eq!(dto.field_errors()["title"], "Title cannot be empty");
    }

    #[test]
    fn missing_fields_deserialize_to_validation_failures() {
        let dto: PostDto = serde_json::from_str(r#"{"title":"Hello"}"#).unwrap();
        let err = dto.validate().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let fields = err.field_errors.unwrap();
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("categoryId"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn comment_constraints() {
        let dto = CommentDto {
            name: "Reader".into(),
            email: "not-an-email".into(),
            body: "too short".into(),
            ..Default::default()
        };
        let errors = dto.field_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["email"], "Email should be valid");
        assert_eq!(errors["body"], "Body must have at least 10 characters");
    }

    #[test]
    fn register_constraints() {
        let dto = RegisterDto {
            name: " ".into(),
            username: "bob".into(),
            email: "bob@example.com".into(),
            password: String::new(),
        };
        let errors = dto.field_errors();
        assert_eq!(errors.keys().collect::<Vec<_>>(), ["name", "password"]);
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.io"));
        assert!(is_valid_email("first.last@example.co.uk"));
        assert!(!is_valid_email("ab.io"));
        assert!(!is_valid_email("@b.io"));
        assert!(!is_valid_email("a@"));
        assert!(!is_valid_email("a@b@c"));
        assert!(!is_valid_email("a b@c.io"));
    }

    #[test]
    fn post_dto_json_is_camel_case() {
        let post = Post {
            id: 3,
            title: "Title".into(),
            description: "Description".into(),
            content: "Content".into(),
            category_id: 9,
        };
        let json = serde_json::to_value(PostDto::from_post(post, vec![])).unwrap();
        assert_eq!(json["categoryId"], 9);
        assert_eq!(json["comments"], serde_json::json!([]));
    }

    #[test]
    fn jwt_response_shape() {
        let json = serde_json::to_value(JwtAuthResponse::bearer("abc".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"accessToken": "abc", "tokenType": "Bearer"})
        );
    }

    #[test]
    fn current_user_lists_roles() {
        let me = CurrentUser::from(Principal::new("root", [Role::User, Role::Admin]));
        assert_eq!(me.roles, ["ADMIN", "USER"]);
    }
}
