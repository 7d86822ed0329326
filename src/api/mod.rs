mod admin;
mod chirps;
mod error;
mod sessions;
mod users;
mod webhooks;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::cli::Platform;
use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::refresh::RefreshTokenService;

pub use error::ApiError;

/// Create the router served under `/api`.
pub fn create_api_router(
    db: Database,
    jwt: Arc<JwtConfig>,
    refresh: RefreshTokenService,
    polka_key: Arc<str>,
) -> Router {
    let users_state = users::UsersState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let sessions_state = sessions::SessionsState {
        db: db.clone(),
        jwt: jwt.clone(),
        refresh,
    };

    let chirps_state = chirps::ChirpsState {
        db: db.clone(),
        jwt,
    };

    let webhooks_state = webhooks::WebhooksState { db, polka_key };

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/users", users::router(users_state))
        .nest("/chirps", chirps::router(chirps_state))
        .nest("/polka", webhooks::router(webhooks_state))
        .merge(sessions::router(sessions_state))
}

/// Create the router served under `/admin`.
pub fn create_admin_router(db: Database, platform: Platform) -> Router {
    admin::router(admin::AdminState { db, platform })
}

async fn healthz() -> &'static str {
    "OK"
}
