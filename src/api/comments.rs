// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::{CommentDto, Validate},
    service::CommentService,
    state::AppState,
};

pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<u64>,
    Json(dto): Json<CommentDto>,
) -> Result<(StatusCode, Json<CommentDto>), ApiError> {
    dto.validate()?;
    let comment = CommentService::new(&state.db).create(post_id, dto)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<u64>,
) -> Result<Json<Vec<CommentDto>>, ApiError> {
    Ok(Json(CommentService::new(&state.db).list_by_post(post_id)?))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(u64, u64)>,
) -> Result<Json<CommentDto>, ApiError> {
    Ok(Json(
        CommentService::new(&state.db).get(post_id, comment_id)?,
    ))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(u64, u64)>,
    Json(dto): Json<CommentDto>,
) -> Result<Json<CommentDto>, ApiError> {
    dto.validate()?;
    Ok(Json(
        CommentService::new(&state.db).update(post_id, comment_id, dto)?,
    ))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(u64, u64)>,
) -> Result<StatusCode, ApiError> {
    CommentService::new(&state.db).delete(post_id, comment_id)?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;
    use crate::storage::{Post, PostRepository, Repository};

    fn comment(body: &str) -> CommentDto {
        CommentDto {
            name: "Reader".into(),
            email: "reader@example.com".into(),
            body: body.into(),
            ..Default::default()
        }
    }

    fn add_post(state: &AppState) -> u64 {
        PostRepository::new(&state.db)
            .save(Post {
                id: 0,
                title: "Title".into(),
                description: "Description text".into(),
                content: "Content".into(),
                category_id: 1,
            })
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn comment_lifecycle() {
        let (_dir, state) = test_state();
        let post_id = add_post(&state);

        let (status, Json(created)) = create_comment(
            State(state.clone()),
            Path(post_id),
            Json(comment("First comment here")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(updated) = update_comment(
            State(state.clone()),
            Path((post_id, created.id)),
            Json(comment("Edited comment text")),
        )
        .await
        .unwrap();
        assert_eq!(updated.body, "Edited comment text");

        let status = delete_comment(State(state.clone()), Path((post_id, created.id)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);

        let Json(remaining) = list_comments(State(state), Path(post_id)).await.unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let (_dir, state) = test_state();
        let post_id = add_post(&state);
        let mut dto = comment("Body long enough");
        dto.email = "nope".into();

        let err = create_comment(State(state), Path(post_id), Json(dto))
            .await
            .unwrap_err();
        assert_eq!(err.field_errors.unwrap()["email"], "Email should be valid");
    }
}
