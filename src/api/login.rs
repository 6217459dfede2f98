// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{auth::AuthError, models::LoginResponse, state::AppState};

/// Issue a bearer token for the `/v1` routes.
///
/// Login stub carried over from the upstream services: no credentials are
/// checked and the token subject is always `admin`. Swagger users call this
/// once and paste the token into Authorize.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    responses((status = 200, body = LoginResponse))
)]
pub async fn login(State(state): State<AppState>) -> Result<Json<LoginResponse>, AuthError> {
    let access_token = state.token_keys.issue("admin")?;
    Ok(Json(LoginResponse { access_token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let (state, _dir) = AppState::for_tests();

        let Json(response) = login(State(state.clone())).await.expect("login succeeds");

        let claims = state.token_keys.verify(&response.access_token).unwrap();
        assert_eq!(claims.sub, "admin");
    }
}
