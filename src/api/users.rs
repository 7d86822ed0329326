//! Account endpoints.
//!
//! - POST `/` - Register with email and password
//! - PUT `/` - Change own email and password (bearer access token)

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::error::{ApiError, is_unique_violation};
use crate::auth::{Auth, AuthError};
use crate::db::{Database, User};
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;
use crate::password::hash_password;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_backend!(UsersState);

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/", post(create_user).put(update_user))
        .with_state(state)
}

#[derive(Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
}

/// Public view of a user. Never includes the password hash.
#[derive(Serialize)]
pub(super) struct UserResponse {
    pub id: Uuid,
    pub created_at: String,
    pub updated_at: String,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

fn validate_credentials(payload: &CredentialsRequest) -> Result<(), ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::bad_request("Email cannot be empty"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::bad_request("Password cannot be empty"));
    }
    Ok(())
}

/// Hash off the async runtime; Argon2 is deliberately slow.
async fn hash_in_background(password: String) -> Result<String, ApiError> {
    let digest = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))??;
    Ok(digest)
}

async fn create_user(
    State(state): State<UsersState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_credentials(&payload)?;
    let email = payload.email.trim().to_string();
    let digest = hash_in_background(payload.password).await?;

    let user = match state.db.users().create(&email, &digest).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Email is already registered"));
        }
        Err(e) => return Err(ApiError::db_error("Failed to create user", e)),
    };

    tracing::info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn update_user(
    State(state): State<UsersState>,
    Auth(user_id): Auth,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_credentials(&payload)?;
    let email = payload.email.trim().to_string();
    let digest = hash_in_background(payload.password).await?;

    let updated = match state
        .db
        .users()
        .update_credentials(user_id, &email, &digest)
        .await
    {
        Ok(updated) => updated,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::conflict("Email is already registered"));
        }
        Err(e) => return Err(ApiError::db_error("Failed to update user", e)),
    };

    let user = updated.ok_or_else(|| ApiError::not_found("User not found"))?;
    tracing::info!(user_id = %user.id, "User credentials updated");

    Ok(Json(UserResponse::from(user)))
}
