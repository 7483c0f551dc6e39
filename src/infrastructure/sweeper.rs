// src/infrastructure/sweeper.rs
use crate::application::commands::users::UserCommandService;
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

/// Periodically delete expired refresh-token records. The first sweep runs
/// one full period after start. Abort the returned handle to stop it.
pub fn spawn_refresh_token_sweeper(
    user_commands: Arc<UserCommandService>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(err) = user_commands.purge_expired_refresh_tokens().await {
                tracing::warn!(error = %err, "refresh token sweep failed");
            }
        }
    })
}
