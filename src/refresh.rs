//! Refresh token lifecycle.
//!
//! Refresh tokens are opaque random strings, persisted so they can be
//! revoked. They are exchanged for short-lived access tokens and never
//! rotated or extended by that exchange.

use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::clock::Clock;
use crate::db::{RefreshTokenRecord, RefreshTokenRepository};
use crate::jwt::{ACCESS_TOKEN_TTL, AccessTokenResult, JwtConfig};

/// Refresh token lifetime: 60 days.
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(60 * 24 * 60 * 60);

const TOKEN_BYTES: usize = 32;

#[derive(Clone)]
pub struct RefreshTokenService {
    repo: Arc<dyn RefreshTokenRepository>,
    clock: Arc<dyn Clock>,
}

impl RefreshTokenService {
    pub fn new(repo: Arc<dyn RefreshTokenRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Create and persist a new refresh token for `user_id`.
    pub async fn issue(&self, user_id: Uuid) -> Result<RefreshTokenRecord, AuthError> {
        let now = self.clock.now();
        let record = RefreshTokenRecord {
            token: generate_token(),
            user_id,
            created_at: now,
            expires_at: now.saturating_add(REFRESH_TOKEN_TTL.as_secs()),
            revoked_at: None,
        };

        self.repo.insert(&record).await?;
        tracing::debug!(user_id = %user_id, expires_at = record.expires_at, "Issued refresh token");
        Ok(record)
    }

    /// Exchange a live refresh token for a fresh access token.
    pub async fn renew(
        &self,
        token: &str,
        jwt: &JwtConfig,
    ) -> Result<AccessTokenResult, AuthError> {
        let record = self
            .repo
            .find_by_token(token)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if record.revoked_at.is_some() {
            return Err(AuthError::TokenRevoked);
        }
        if self.clock.now() >= record.expires_at {
            return Err(AuthError::TokenExpired);
        }

        jwt.issue_access_token(record.user_id, ACCESS_TOKEN_TTL)
    }

    /// Revoke a refresh token. Revoking twice is not an error and keeps the
    /// first revocation time.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        if !self.repo.set_revoked(token, self.clock.now()).await? {
            return Err(AuthError::TokenNotFound);
        }
        Ok(())
    }
}

/// 256 bits from the OS-seeded CSPRNG, hex-encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
