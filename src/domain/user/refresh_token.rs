// src/domain/user/refresh_token.rs
use crate::domain::errors::DomainResult;
use crate::domain::user::value_objects::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Server-side record of an issued refresh token. Only the SHA-256 digest of
/// the token is stored.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(&self, token: NewRefreshToken) -> DomainResult<()>;

    async fn find_by_hash(&self, token_hash: &str) -> DomainResult<Option<RefreshTokenRecord>>;

    /// Replace `old_hash` with the new token in one statement. Returns `false`
    /// when no record with `old_hash` existed (already rotated or revoked).
    async fn rotate(
        &self,
        old_hash: &str,
        replacement: NewRefreshToken,
    ) -> DomainResult<bool>;

    /// Returns `true` when a record was removed.
    async fn delete_by_hash(&self, token_hash: &str) -> DomainResult<bool>;

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64>;
}
