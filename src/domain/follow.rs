// src/domain/follow.rs
use crate::domain::errors::DomainResult;
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Directed edge: `follower_id` follows `following_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Follow {
    pub follower_id: UserId,
    pub following_id: UserId,
}

impl Follow {
    pub fn new(follower_id: UserId, following_id: UserId) -> Self {
        Self {
            follower_id,
            following_id,
        }
    }

    pub fn is_self_follow(&self) -> bool {
        self.follower_id == self.following_id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowCounts {
    pub followers: u64,
    pub following: u64,
}

#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn exists(&self, follow: Follow) -> DomainResult<bool>;

    /// Fails with `Conflict` when the edge is already stored.
    async fn insert(&self, follow: Follow, created_at: DateTime<Utc>) -> DomainResult<()>;

    /// Returns `true` when a row was removed.
    async fn delete(&self, follow: Follow) -> DomainResult<bool>;

    async fn counts(&self, user_id: UserId) -> DomainResult<FollowCounts>;
}
