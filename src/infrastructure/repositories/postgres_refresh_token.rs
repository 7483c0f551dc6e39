// src/infrastructure/repositories/postgres_refresh_token.rs
use super::map_sqlx;
use crate::domain::errors::DomainResult;
use crate::domain::user::{NewRefreshToken, RefreshTokenRecord, RefreshTokenRepository, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RefreshTokenRow {
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshTokenRecord {
    fn from(row: RefreshTokenRow) -> Self {
        Self {
            user_id: UserId::new(row.user_id),
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn insert(&self, token: NewRefreshToken) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(token.user_id.as_uuid())
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> DomainResult<Option<RefreshTokenRecord>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "SELECT user_id, token_hash, expires_at, created_at
             FROM refresh_tokens WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(Into::into))
    }

    async fn rotate(&self, old_hash: &str, replacement: NewRefreshToken) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens
             SET token_hash = $2, expires_at = $3, created_at = $4
             WHERE token_hash = $1 AND user_id = $5",
        )
        .bind(old_hash)
        .bind(&replacement.token_hash)
        .bind(replacement.expires_at)
        .bind(replacement.created_at)
        .bind(replacement.user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_by_hash(&self, token_hash: &str) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(result.rows_affected())
    }
}
