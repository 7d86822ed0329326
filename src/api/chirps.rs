//! Chirp endpoints.
//!
//! - POST `/` - Post a chirp (bearer access token)
//! - GET `/` - List chirps, optionally by `author_id`, sorted by `sort=asc|desc`
//! - GET `/{id}` - Get one chirp
//! - DELETE `/{id}` - Delete own chirp (bearer access token)

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::error::{ApiError, ResultExt, parse_uuid};
use crate::auth::{Auth, AuthError, authorize_ownership};
use crate::content::{MAX_CHIRP_LENGTH, clean_chirp, within_limit};
use crate::db::{Chirp, Database, SortOrder};
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct ChirpsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_backend!(ChirpsState);

pub fn router(state: ChirpsState) -> Router {
    Router::new()
        .route("/", get(list_chirps).post(create_chirp))
        .route("/{id}", get(get_chirp).delete(delete_chirp))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateChirpRequest {
    body: String,
}

#[derive(Deserialize)]
struct ListChirpsQuery {
    author_id: Option<String>,
    sort: Option<String>,
}

#[derive(Serialize)]
struct ChirpResponse {
    id: Uuid,
    created_at: String,
    updated_at: String,
    body: String,
    user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

async fn create_chirp(
    State(state): State<ChirpsState>,
    Auth(user_id): Auth,
    Json(payload): Json<CreateChirpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !within_limit(&payload.body) {
        return Err(ApiError::bad_request(format!(
            "Chirp is too long (max {} characters)",
            MAX_CHIRP_LENGTH
        )));
    }

    let chirp = state
        .db
        .chirps()
        .create(&clean_chirp(&payload.body), user_id)
        .await
        .db_err("Failed to create chirp")?;

    tracing::debug!(user_id = %user_id, chirp_id = %chirp.id, "Chirp created");

    Ok((StatusCode::CREATED, Json(ChirpResponse::from(chirp))))
}

async fn list_chirps(
    State(state): State<ChirpsState>,
    Query(query): Query<ListChirpsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let author = match query.author_id.as_deref() {
        None | Some("") => None,
        Some(id) => Some(parse_uuid(id)?),
    };

    let order = match query.sort.as_deref() {
        None | Some("") | Some("asc") => SortOrder::Asc,
        Some("desc") => SortOrder::Desc,
        Some(_) => return Err(ApiError::bad_request("sort must be 'asc' or 'desc'")),
    };

    let chirps = state
        .db
        .chirps()
        .list(author, order)
        .await
        .db_err("Failed to list chirps")?;

    Ok(Json(
        chirps
            .into_iter()
            .map(ChirpResponse::from)
            .collect::<Vec<_>>(),
    ))
}

async fn get_chirp(
    State(state): State<ChirpsState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_uuid(&id)?;

    let chirp = state
        .db
        .chirps()
        .get(id)
        .await
        .db_err("Failed to get chirp")?
        .ok_or_else(|| ApiError::not_found("Chirp not found"))?;

    Ok(Json(ChirpResponse::from(chirp)))
}

async fn delete_chirp(
    State(state): State<ChirpsState>,
    Auth(user_id): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_uuid(&id)?;

    let chirp = state
        .db
        .chirps()
        .get(id)
        .await
        .db_err("Failed to get chirp")?
        .ok_or_else(|| ApiError::not_found("Chirp not found"))?;

    if !authorize_ownership(user_id, chirp.user_id) {
        tracing::warn!(user_id = %user_id, chirp_id = %id, "Refused to delete another user's chirp");
        return Err(AuthError::Forbidden.into());
    }

    let deleted = state
        .db
        .chirps()
        .delete(id)
        .await
        .db_err("Failed to delete chirp")?;

    if !deleted {
        return Err(ApiError::not_found("Chirp not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
