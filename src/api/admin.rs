//! Admin endpoints.
//!
//! - POST `/reset` - Delete every user (and with them all chirps and
//!   refresh tokens). Only available on the dev platform.

use axum::{Router, extract::State, response::IntoResponse, routing::post};

use super::error::{ApiError, ResultExt};
use crate::cli::Platform;
use crate::db::Database;

#[derive(Clone)]
pub struct AdminState {
    pub db: Database,
    pub platform: Platform,
}

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/reset", post(reset))
        .with_state(state)
}

async fn reset(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    if state.platform != Platform::Dev {
        return Err(ApiError::forbidden(
            "Reset is only allowed on the dev platform",
        ));
    }

    let count = state
        .db
        .users()
        .delete_all()
        .await
        .db_err("Failed to reset users")?;

    tracing::warn!(count, "All users deleted by reset");
    Ok("OK")
}
