// src/application/ports/security.rs
use crate::application::{
    ApplicationResult,
    dto::{AuthenticatedUser, IssuedToken, RefreshClaims, TokenSubject},
};
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> ApplicationResult<String>;
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()>;
}

#[async_trait]
pub trait TokenManager: Send + Sync {
    async fn issue_access(&self, subject: &TokenSubject) -> ApplicationResult<IssuedToken>;

    /// Every call yields a distinct token, even for the same subject.
    async fn issue_refresh(&self, subject: &TokenSubject) -> ApplicationResult<IssuedToken>;

    /// Verify an access token, including its expiry.
    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser>;

    /// Verify a refresh token's signature and type without checking expiry.
    async fn decode_refresh(&self, token: &str) -> ApplicationResult<RefreshClaims>;
}
