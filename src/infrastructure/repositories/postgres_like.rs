// src/infrastructure/repositories/postgres_like.rs
use super::map_sqlx;
use crate::domain::errors::DomainResult;
use crate::domain::like::{Like, LikeRepository};
use crate::domain::pastry::PastryId;
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn exists(&self, like: Like) -> DomainResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM likes WHERE pastry_id = $1 AND user_id = $2)",
        )
        .bind(like.pastry_id.as_uuid())
        .bind(like.user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn insert(&self, like: Like, created_at: DateTime<Utc>) -> DomainResult<()> {
        sqlx::query("INSERT INTO likes (pastry_id, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(like.pastry_id.as_uuid())
            .bind(like.user_id.as_uuid())
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn delete(&self, like: Like) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE pastry_id = $1 AND user_id = $2")
            .bind(like.pastry_id.as_uuid())
            .bind(like.user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn liked_among(
        &self,
        user_id: UserId,
        pastry_ids: &[PastryId],
    ) -> DomainResult<HashSet<PastryId>> {
        let ids: Vec<Uuid> = pastry_ids.iter().map(PastryId::as_uuid).collect();
        let liked = sqlx::query_scalar::<_, Uuid>(
            "SELECT pastry_id FROM likes WHERE user_id = $1 AND pastry_id = ANY($2)",
        )
        .bind(user_id.as_uuid())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(liked.into_iter().map(PastryId::new).collect())
    }
}
