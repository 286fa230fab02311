pub mod jwks;
pub mod verifier;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use jwks::{JwksProvider, RemoteJwks, StaticJwks};
pub use verifier::Authorizer;

/// Access-token claims this service reads. Validation of `exp`, `aud` and
/// `iss` happens inside `jsonwebtoken` before these are deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Caller identity injected into request extensions by the permission guard
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub subject: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
        }
    }
}

/// Guard failure. `status_code` is the provider-style status reported in
/// the body; the HTTP response itself is always 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {description}")]
pub struct AuthError {
    pub code: &'static str,
    pub description: String,
    pub status_code: u16,
}

impl AuthError {
    fn new(code: &'static str, description: impl Into<String>, status_code: u16) -> Self {
        Self { code, description: description.into(), status_code }
    }

    pub fn header_missing() -> Self {
        Self::new("authorization_header_missing", "Authorization header is expected.", 401)
    }

    pub fn invalid_header(description: impl Into<String>, status_code: u16) -> Self {
        Self::new("invalid_header", description, status_code)
    }

    pub fn token_expired() -> Self {
        Self::new("token_expired", "Token expired.", 401)
    }

    pub fn incorrect_claims() -> Self {
        Self::new(
            "invalid_claims",
            "Incorrect claims. Please, check the audience and issuer.",
            401,
        )
    }

    pub fn permissions_missing() -> Self {
        Self::new("invalid_claims", "Permissions not included in JWT.", 400)
    }

    pub fn permission_not_found(permission: &str) -> Self {
        Self::new("unauthorized", format!("Permission not found: {}.", permission), 403)
    }

    pub fn keys_unavailable(description: impl Into<String>) -> Self {
        Self::new("jwks_unavailable", description, 503)
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or_else(AuthError::header_missing)?;
    let value = value
        .to_str()
        .map_err(|_| AuthError::invalid_header("Authorization header must be bearer token.", 401))?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(AuthError::header_missing()),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::invalid_header(
            "Authorization header must start with \"Bearer\".",
            401,
        )),
        [_] => Err(AuthError::invalid_header("Token not found.", 401)),
        [_, token] => Ok(*token),
        _ => Err(AuthError::invalid_header("Authorization header must be bearer token.", 401)),
    }
}

/// Require `permission` to be listed in the token's `permissions` claim
pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let permissions = claims.permissions.as_ref().ok_or_else(AuthError::permissions_missing)?;
    if permissions.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::permission_not_found(permission))
    }
}
