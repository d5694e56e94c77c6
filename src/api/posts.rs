// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::ApiError,
    models::{PostDto, PostResponse, Validate},
    service::PostService,
    state::AppState,
    storage::{
        page::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, DEFAULT_SORT_BY, DEFAULT_SORT_DIRECTION},
        PageRequest, SortDirection,
    },
};

pub const POST_DELETED: &str = "Post deleted successfully";

/// `?pageNo=&pageSize=&sortBy=&sortOrder=`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostListQuery {
    pub page_no: u32,
    pub page_size: u32,
    pub sort_by: String,
    pub sort_order: String,
}

impl Default for PostListQuery {
    fn default() -> Self {
        Self {
            page_no: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_order: DEFAULT_SORT_DIRECTION.to_string(),
        }
    }
}

impl From<PostListQuery> for PageRequest {
    fn from(query: PostListQuery) -> Self {
        PageRequest::new(
            query.page_no,
            query.page_size,
            query.sort_by,
            SortDirection::parse(&query.sort_order),
        )
    }
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostResponse>, ApiError> {
    let request = PageRequest::from(query);
    Ok(Json(PostService::new(&state.db).list(&request)?))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(dto): Json<PostDto>,
) -> Result<(StatusCode, Json<PostDto>), ApiError> {
    dto.validate()?;
    let post = PostService::new(&state.db).create(dto)?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PostDto>, ApiError> {
    Ok(Json(PostService::new(&state.db).get(id)?))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(dto): Json<PostDto>,
) -> Result<Json<PostDto>, ApiError> {
    dto.validate()?;
    Ok(Json(PostService::new(&state.db).update(id, dto)?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<&'static str, ApiError> {
    PostService::new(&state.db).delete(id)?;
    Ok(POST_DELETED)
}

pub async fn list_posts_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<u64>,
) -> Result<Json<Vec<PostDto>>, ApiError> {
    Ok(Json(
        PostService::new(&state.db).list_by_category(category_id)?,
    ))
}
