//! Session endpoints.
//!
//! - POST `/login` - Exchange email and password for an access and refresh token
//! - POST `/refresh` - Exchange a refresh token (bearer) for a new access token
//! - POST `/revoke` - Revoke a refresh token (bearer)

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use super::users::UserResponse;
use crate::auth::{BearerToken, login};
use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::refresh::RefreshTokenService;

#[derive(Clone)]
pub struct SessionsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub refresh: RefreshTokenService,
}

pub fn router(state: SessionsState) -> Router {
    Router::new()
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_token))
        .route("/revoke", post(revoke_token))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    #[serde(flatten)]
    user: UserResponse,
    token: String,
    refresh_token: String,
}

#[derive(Serialize)]
struct RefreshResponse {
    token: String,
}

async fn login_user(
    State(state): State<SessionsState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.db.users();
    let session = login(
        &users,
        &state.jwt,
        &state.refresh,
        payload.email.trim(),
        &payload.password,
    )
    .await?;

    Ok(Json(LoginResponse {
        user: session.user.into(),
        token: session.access_token.token,
        refresh_token: session.refresh_token,
    }))
}

/// The refresh token is not rotated; the client keeps using it until it
/// expires or is revoked.
async fn refresh_token(
    State(state): State<SessionsState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, ApiError> {
    let access = state.refresh.renew(&token, &state.jwt).await?;
    Ok(Json(RefreshResponse {
        token: access.token,
    }))
}

async fn revoke_token(
    State(state): State<SessionsState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, ApiError> {
    state.refresh.revoke(&token).await?;
    tracing::info!("Refresh token revoked");
    Ok(StatusCode::NO_CONTENT)
}
