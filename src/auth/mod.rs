// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token authentication (HS256 JWT).
//!
//! `POST /login` issues a short-lived token signed with the shared secret
//! from `JWT_SECRET_KEY`; every `/v1` route requires it via the [`Auth`]
//! extractor. There is no user store: the login stub authenticates as
//! `admin`, matching the upstream services.

mod error;
mod extractor;

pub use error::AuthError;
pub use extractor::Auth;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Issued tokens are valid for one hour.
const TOKEN_TTL_SECS: i64 = 3600;

/// JWT claims carried by issued tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (authenticated identity).
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// HS256 key pair derived from the shared secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a bearer token for `subject`, valid for one hour.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(e.to_string()))
    }

    /// Validate a bearer token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = CLOCK_SKEW_LEEWAY;

        let token_data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let keys = TokenKeys::from_secret(b"test-secret");
        let token = keys.issue("admin").unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn verify_rejects_token_from_other_secret() {
        let keys = TokenKeys::from_secret(b"test-secret");
        let other = TokenKeys::from_secret(b"other-secret");

        let token = other.issue("admin").unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = TokenKeys::from_secret(b"test-secret");
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "admin".into(),
            iat: now - 7200,
            // Past the 60s leeway.
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();

        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = TokenKeys::from_secret(b"test-secret");
        let err = keys.verify("not-a-jwt").unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }
}
