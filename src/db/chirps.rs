//! Chirp storage.

use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use super::parse_uuid;

#[derive(Clone)]
pub struct ChirpStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone)]
pub struct Chirp {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

/// Listing order by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(sqlx::FromRow)]
struct ChirpRow {
    id: String,
    body: String,
    user_id: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChirpRow> for Chirp {
    type Error = sqlx::Error;

    fn try_from(row: ChirpRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            body: row.body,
            user_id: parse_uuid(&row.user_id)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl ChirpStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a chirp owned by `user_id`.
    pub async fn create(&self, body: &str, user_id: Uuid) -> Result<Chirp, sqlx::Error> {
        let row: ChirpRow = sqlx::query_as(
            "INSERT INTO chirps (id, body, user_id) VALUES (?, ?, ?)
             RETURNING id, body, user_id, created_at, updated_at",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(body)
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    /// Get a chirp by ID.
    pub async fn get(&self, id: Uuid) -> Result<Option<Chirp>, sqlx::Error> {
        let row: Option<ChirpRow> = sqlx::query_as(
            "SELECT id, body, user_id, created_at, updated_at FROM chirps WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Chirp::try_from).transpose()
    }

    /// List chirps, optionally only those by one author.
    ///
    /// Ties on `created_at` (second resolution) fall back to insertion order.
    pub async fn list(
        &self,
        author: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, sqlx::Error> {
        let query = match order {
            SortOrder::Asc => {
                "SELECT id, body, user_id, created_at, updated_at FROM chirps
                 WHERE ?1 IS NULL OR user_id = ?1
                 ORDER BY created_at ASC, rowid ASC"
            }
            SortOrder::Desc => {
                "SELECT id, body, user_id, created_at, updated_at FROM chirps
                 WHERE ?1 IS NULL OR user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            }
        };

        let rows: Vec<ChirpRow> = sqlx::query_as(query)
            .bind(author.map(|id| id.to_string()))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Chirp::try_from).collect()
    }

    /// Delete a chirp. Returns false if it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
