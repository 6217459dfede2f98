// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated callers.
//!
//! Use the `Auth` extractor in handlers to require a bearer token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims.sub is the authenticated identity
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, Claims};
use crate::state::AppState;

/// Extractor that validates the `Authorization: Bearer <jwt>` header against
/// the application's token keys and yields the verified [`Claims`].
#[derive(Debug)]
pub struct Auth(pub Claims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?
            .trim();

        let claims = state.token_keys.verify(token)?;
        Ok(Auth(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/v1/pan/link-requests");
        if let Some(v) = value {
            builder = builder.header(AUTHORIZATION, v);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn accepts_valid_bearer_token() {
        let (state, _dir) = AppState::for_tests();
        let token = state.token_keys.issue("admin").unwrap();

        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let Auth(claims) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let (state, _dir) = AppState::for_tests();
        let mut parts = parts_with_header(None);
        let err = Auth::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingAuthHeader));
    }

    #[tokio::test]
    async fn rejects_non_bearer_scheme() {
        let (state, _dir) = AppState::for_tests();
        let mut parts = parts_with_header(Some("Basic YWRtaW46cGFzcw=="));
        let err = Auth::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidAuthHeader));
    }
}
