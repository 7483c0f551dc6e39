use std::sync::Arc;

use crate::application::{
    dto::{AuthTokenDto, TokenSubject},
    error::ApplicationResult,
    ports::{
        security::{PasswordHasher, TokenManager},
        time::Clock,
    },
};
use crate::domain::user::{NewRefreshToken, RefreshTokenRepository, User, UserRepository};

use super::refresh::hash_refresh_token;

pub struct UserCommandService {
    pub(super) user_repo: Arc<dyn UserRepository>,
    pub(super) refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub(super) password_hasher: Arc<dyn PasswordHasher>,
    pub(super) token_manager: Arc<dyn TokenManager>,
    pub(super) clock: Arc<dyn Clock>,
}

impl UserCommandService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_manager: Arc<dyn TokenManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            refresh_tokens,
            password_hasher,
            token_manager,
            clock,
        }
    }

    pub(super) fn subject_for(user: &User) -> TokenSubject {
        TokenSubject {
            user_id: user.id,
            username: user.username.to_string(),
        }
    }

    /// Issue an access/refresh pair and persist the refresh token's digest.
    pub(super) async fn issue_token_pair(&self, user: &User) -> ApplicationResult<AuthTokenDto> {
        let subject = Self::subject_for(user);
        let access = self.token_manager.issue_access(&subject).await?;
        let refresh = self.token_manager.issue_refresh(&subject).await?;

        self.refresh_tokens
            .insert(NewRefreshToken {
                user_id: user.id,
                token_hash: hash_refresh_token(&refresh.token),
                expires_at: refresh.expires_at,
                created_at: self.clock.now(),
            })
            .await?;

        Ok(AuthTokenDto::from_pair(access, refresh))
    }

    /// Remove refresh records whose expiry has passed. Returns how many were
    /// deleted.
    pub async fn purge_expired_refresh_tokens(&self) -> ApplicationResult<u64> {
        let removed = self.refresh_tokens.delete_expired(self.clock.now()).await?;
        if removed > 0 {
            tracing::info!(removed, "purged expired refresh tokens");
        }
        Ok(removed)
    }
}
