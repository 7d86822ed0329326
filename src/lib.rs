pub mod api;
pub mod auth;
pub mod cli;
pub mod clock;
pub mod content;
pub mod db;
pub mod jwt;
pub mod password;
pub mod refresh;

use api::{create_admin_router, create_api_router};
use axum::Router;
use cli::Platform;
use clock::Clock;
use db::Database;
use jwt::JwtConfig;
use refresh::RefreshTokenService;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing access tokens
    pub jwt_secret: Vec<u8>,
    /// Pre-shared key the payment provider sends in `X-Api-Key`
    pub polka_key: String,
    /// Deployment platform; destructive admin endpoints only work on dev
    pub platform: Platform,
    /// Time source for token issuance and expiry
    pub clock: Arc<dyn Clock>,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::with_clock(
        &config.jwt_secret,
        config.clock.clone(),
    ));
    let refresh = RefreshTokenService::new(Arc::new(config.db.tokens()), config.clock.clone());

    let api_router = create_api_router(
        config.db.clone(),
        jwt,
        refresh,
        Arc::from(config.polka_key.as_str()),
    );

    Router::new()
        .nest("/api", api_router)
        .nest("/admin", create_admin_router(config.db.clone(), config.platform))
}

/// Serve the application on `listener` until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, create_app(&config)).await
}
