//! Request-level authentication and authorization checks.

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use super::credentials::{api_key, bearer_token};
use super::errors::AuthError;
use crate::jwt::JwtConfig;

/// Resolve the caller's identity from a bearer access token.
///
/// Failure kinds are passed through untouched so a missing header, a bad
/// signature and an expired token stay distinguishable.
pub fn authenticate(headers: &HeaderMap, jwt: &JwtConfig) -> Result<Uuid, AuthError> {
    let token = bearer_token(headers)?;
    jwt.validate_access_token(token)
}

/// True iff the authenticated user owns the resource.
///
/// A `false` here is a [`AuthError::Forbidden`], not an authentication
/// failure: the caller is known, just not allowed.
pub fn authorize_ownership(user_id: Uuid, resource_owner_id: Uuid) -> bool {
    user_id == resource_owner_id
}

/// Check the pre-shared service key.
///
/// Missing header and wrong key are deliberately indistinguishable.
pub fn authorize_service_key(headers: &HeaderMap, expected_key: &str) -> bool {
    match api_key(headers) {
        Ok(provided) => provided.as_bytes().ct_eq(expected_key.as_bytes()).into(),
        Err(_) => false,
    }
}
