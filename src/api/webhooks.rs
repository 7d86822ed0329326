//! Payment provider webhooks, authenticated by the pre-shared `X-Api-Key`.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::error::{ApiError, ResultExt};
use crate::auth::{AuthError, authorize_service_key};
use crate::db::Database;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Clone)]
pub struct WebhooksState {
    pub db: Database,
    pub polka_key: Arc<str>,
}

pub fn router(state: WebhooksState) -> Router {
    Router::new()
        .route("/webhooks", post(polka_webhook))
        .with_state(state)
}

#[derive(Deserialize)]
struct WebhookEvent {
    event: String,
    #[serde(default)]
    data: Option<WebhookData>,
}

#[derive(Deserialize)]
struct WebhookData {
    user_id: Uuid,
}

/// The key is checked before the body is parsed, so unauthenticated callers
/// learn nothing about the payload format.
async fn polka_webhook(
    State(state): State<WebhooksState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if !authorize_service_key(&headers, &state.polka_key) {
        tracing::warn!("Webhook rejected: bad or missing API key");
        return Err(AuthError::Unauthorized.into());
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid webhook payload: {}", e)))?;

    if event.event != USER_UPGRADED {
        return Ok(StatusCode::NO_CONTENT);
    }

    let data = event
        .data
        .ok_or_else(|| ApiError::bad_request("Missing data.user_id"))?;

    let upgraded = state
        .db
        .users()
        .upgrade_to_red(data.user_id)
        .await
        .db_err("Failed to upgrade user")?;

    if !upgraded {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(user_id = %data.user_id, "User upgraded to Chirpy Red");
    Ok(StatusCode::NO_CONTENT)
}
