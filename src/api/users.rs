// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::{auth::Auth, models::CurrentUser};

/// The authenticated caller.
pub async fn me(Auth(principal): Auth) -> Json<CurrentUser> {
    Json(CurrentUser::from(principal))
}
