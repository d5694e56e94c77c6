// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiError,
    models::{JwtAuthResponse, LoginDto, RegisterDto, Validate},
    service::AccountService,
    state::AppState,
};

/// Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> Result<Json<JwtAuthResponse>, ApiError> {
    let response = AccountService::new(&state.db, &state.tokens).login(dto)?;
    Ok(Json(response))
}

pub async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterDto>,
) -> Result<(StatusCode, &'static str), ApiError> {
    dto.validate()?;
    let message = AccountService::new(&state.db, &state.tokens).register(dto)?;
    Ok((StatusCode::CREATED, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;

    #[tokio::test]
    async fn register_and_login() {
        let (_dir, state) = test_state();

        let (status, message) = register(
            State(state.clone()),
            Json(RegisterDto {
                name: "Alice".into(),
                username: "alice".into(),
                email: "alice@example.com".into(),
                password: "pa55word".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(message, "User registered successfully!");

        let Json(response) = login(
            State(state.clone()),
            Json(LoginDto {
                username_or_email: "alice@example.com".into(),
                password: "pa55word".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(state.tokens.verify(&response.access_token).unwrap(), "alice");
    }

    #[tokio::test]
    async fn register_validates_email() {
        let (_dir, state) = test_state();
        let err = register(
            State(state),
            Json(RegisterDto {
                name: "Alice".into(),
                username: "alice".into(),
                email: "alice".into(),
                password: "pa55word".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
