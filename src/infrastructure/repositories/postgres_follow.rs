// src/infrastructure/repositories/postgres_follow.rs
use super::map_sqlx;
use crate::domain::errors::DomainResult;
use crate::domain::follow::{Follow, FollowCounts, FollowRepository};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

#[derive(Clone)]
pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CountsRow {
    followers: i64,
    following: i64,
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn exists(&self, follow: Follow) -> DomainResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2
             )",
        )
        .bind(follow.follower_id.as_uuid())
        .bind(follow.following_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn insert(&self, follow: Follow, created_at: DateTime<Utc>) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO follows (follower_id, following_id, created_at) VALUES ($1, $2, $3)",
        )
        .bind(follow.follower_id.as_uuid())
        .bind(follow.following_id.as_uuid())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn delete(&self, follow: Follow) -> DomainResult<bool> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
                .bind(follow.follower_id.as_uuid())
                .bind(follow.following_id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn counts(&self, user_id: UserId) -> DomainResult<FollowCounts> {
        let row = sqlx::query_as::<_, CountsRow>(
            "SELECT
                 (SELECT COUNT(*) FROM follows WHERE following_id = $1) AS followers,
                 (SELECT COUNT(*) FROM follows WHERE follower_id = $1) AS following",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(FollowCounts {
            followers: u64::try_from(row.followers).unwrap_or_default(),
            following: u64::try_from(row.following).unwrap_or_default(),
        })
    }
}
