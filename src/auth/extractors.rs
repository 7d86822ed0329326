//! Axum extractors for authentication.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::errors::AuthError;
use super::guard::authenticate;
use super::state::HasAuthBackend;

/// Extractor for endpoints that require a valid bearer access token.
/// Yields the authenticated user's id.
pub struct Auth(pub Uuid);

impl<S> FromRequestParts<S> for Auth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state.jwt())
            .map(Auth)
            .inspect_err(|e| tracing::debug!(error = %e, "Rejected bearer credential"))
    }
}

/// Raw bearer token, for endpoints that take an opaque refresh token rather
/// than an access token.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        super::credentials::bearer_token(&parts.headers).map(|t| BearerToken(t.to_string()))
    }
}
