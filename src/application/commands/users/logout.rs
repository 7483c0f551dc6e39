use super::{UserCommandService, refresh::hash_refresh_token};
use crate::application::error::ApplicationResult;

pub struct LogoutCommand {
    pub refresh_token: String,
}

impl UserCommandService {
    /// Revoke a refresh token. Unknown tokens are ignored.
    pub async fn logout(&self, command: LogoutCommand) -> ApplicationResult<()> {
        let removed = self
            .refresh_tokens
            .delete_by_hash(&hash_refresh_token(&command.refresh_token))
            .await?;
        tracing::debug!(removed, "logout processed");
        Ok(())
    }
}
