//! Refresh token storage.
//!
//! Only refresh tokens are stored; access tokens are stateless. Rows are
//! keyed by the opaque token string itself and timestamps are Unix seconds.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use super::{RefreshTokenRepository, parse_uuid};

/// A persisted refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: u64,
    pub expires_at: u64,
    pub revoked_at: Option<u64>,
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token: String,
    user_id: String,
    created_at: i64,
    expires_at: i64,
    revoked_at: Option<i64>,
}

impl TryFrom<RefreshTokenRow> for RefreshTokenRecord {
    type Error = sqlx::Error;

    fn try_from(row: RefreshTokenRow) -> Result<Self, Self::Error> {
        Ok(Self {
            token: row.token,
            user_id: parse_uuid(&row.user_id)?,
            created_at: from_db_time(row.created_at),
            expires_at: from_db_time(row.expires_at),
            revoked_at: row.revoked_at.map(from_db_time),
        })
    }
}

/// Store for refresh tokens.
#[derive(Clone)]
pub struct TokenStore {
    pool: SqlitePool,
}

impl TokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new token. Fails on a duplicate token or unknown user.
    pub async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO refresh_tokens (token, user_id, created_at, expires_at, revoked_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.token)
        .bind(record.user_id.to_string())
        .bind(to_db_time(record.created_at))
        .bind(to_db_time(record.expires_at))
        .bind(record.revoked_at.map(to_db_time))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a token record by its token string.
    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, sqlx::Error> {
        let row: Option<RefreshTokenRow> = sqlx::query_as(
            "SELECT token, user_id, created_at, expires_at, revoked_at
             FROM refresh_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        row.map(RefreshTokenRecord::try_from).transpose()
    }

    /// Revoke a token. An earlier revocation time is never overwritten.
    pub async fn set_revoked(&self, token: &str, at: u64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = COALESCE(revoked_at, ?) WHERE token = ?",
        )
        .bind(to_db_time(at))
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RefreshTokenRepository for TokenStore {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), sqlx::Error> {
        TokenStore::insert(self, record).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>, sqlx::Error> {
        TokenStore::find_by_token(self, token).await
    }

    async fn set_revoked(&self, token: &str, at: u64) -> Result<bool, sqlx::Error> {
        TokenStore::set_revoked(self, token, at).await
    }
}

// SQLite integers are signed; clock values stay far below i64::MAX.
fn to_db_time(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}

fn from_db_time(secs: i64) -> u64 {
    u64::try_from(secs).unwrap_or(0)
}
