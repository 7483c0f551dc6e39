// src/domain/like.rs
use crate::domain::errors::DomainResult;
use crate::domain::pastry::PastryId;
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Like {
    pub pastry_id: PastryId,
    pub user_id: UserId,
}

impl Like {
    pub fn new(pastry_id: PastryId, user_id: UserId) -> Self {
        Self { pastry_id, user_id }
    }
}

#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn exists(&self, like: Like) -> DomainResult<bool>;

    /// Fails with `Conflict` when the pair is already stored.
    async fn insert(&self, like: Like, created_at: DateTime<Utc>) -> DomainResult<()>;

    /// Returns `true` when a row was removed.
    async fn delete(&self, like: Like) -> DomainResult<bool>;

    /// Subset of `pastry_ids` liked by `user_id`.
    async fn liked_among(
        &self,
        user_id: UserId,
        pastry_ids: &[PastryId],
    ) -> DomainResult<HashSet<PastryId>>;
}
