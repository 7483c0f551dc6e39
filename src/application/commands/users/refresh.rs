use super::UserCommandService;
use crate::{
    application::{
        dto::AuthTokenDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::user::NewRefreshToken,
};
use sha2::{Digest, Sha256};

pub struct RefreshTokenCommand {
    pub token: String,
}

/// Hex SHA-256 digest under which a refresh token is persisted.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

impl UserCommandService {
    pub async fn refresh_token(
        &self,
        command: RefreshTokenCommand,
    ) -> ApplicationResult<AuthTokenDto> {
        let claims = self
            .token_manager
            .decode_refresh(&command.token)
            .await
            .map_err(|_| ApplicationError::unauthorized("invalid refresh token"))?;

        let old_hash = hash_refresh_token(&command.token);
        let record = self
            .refresh_tokens
            .find_by_hash(&old_hash)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("refresh token revoked"))?;

        if record.user_id != claims.user_id {
            return Err(ApplicationError::unauthorized("invalid refresh token"));
        }

        let now = self.clock.now();
        if record.is_expired(now) {
            self.refresh_tokens.delete_by_hash(&old_hash).await?;
            return Err(ApplicationError::unauthorized("refresh token expired"));
        }

        let user = self
            .user_repo
            .find_by_id(record.user_id)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("refresh token revoked"))?;

        let subject = Self::subject_for(&user);
        let refresh = self.token_manager.issue_refresh(&subject).await?;
        let rotated = self
            .refresh_tokens
            .rotate(
                &old_hash,
                NewRefreshToken {
                    user_id: user.id,
                    token_hash: hash_refresh_token(&refresh.token),
                    expires_at: refresh.expires_at,
                    created_at: now,
                },
            )
            .await?;

        // Lost a race with a concurrent refresh or logout.
        if !rotated {
            return Err(ApplicationError::unauthorized("refresh token revoked"));
        }

        let access = self.token_manager.issue_access(&subject).await?;
        tracing::debug!(user_id = %user.id, "refresh token rotated");
        Ok(AuthTokenDto::from_pair(access, refresh))
    }
}
