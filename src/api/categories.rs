// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{error::ApiError, models::CategoryDto, service::CategoryService, state::AppState};

pub async fn add_category(
    State(state): State<AppState>,
    Json(dto): Json<CategoryDto>,
) -> Result<(StatusCode, Json<CategoryDto>), ApiError> {
    let category = CategoryService::new(&state.db).add(dto)?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    Ok(Json(CategoryService::new(&state.db).list()?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<CategoryDto>, ApiError> {
    Ok(Json(CategoryService::new(&state.db).get(id)?))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(dto): Json<CategoryDto>,
) -> Result<Json<CategoryDto>, ApiError> {
    Ok(Json(CategoryService::new(&state.db).update(id, dto)?))
}

/// Responds `Deleted N rows`, counting the category, its posts and their
/// comments.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<String, ApiError> {
    let rows = CategoryService::new(&state.db).delete(id)?;
    Ok(format!("Deleted {rows} rows"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;

    #[tokio::test]
    async fn add_update_delete() {
        let (_dir, state) = test_state();

        let (status, Json(created)) = add_category(
            State(state.clone()),
            Json(CategoryDto {
                name: "Rust".into(),
                description: "Systems".into(),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(updated) = update_category(
            State(state.clone()),
            Path(created.id),
            Json(CategoryDto {
                name: "Rust 2024".into(),
                ..created.clone()
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Rust 2024");

        let message = delete_category(State(state.clone()), Path(created.id))
            .await
            .unwrap();
        assert_eq!(message, "Deleted 1 rows");

        let Json(all) = list_categories(State(state)).await.unwrap();
        assert!(all.is_empty());
    }
}
