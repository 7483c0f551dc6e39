use std::sync::Arc;

use crate::{
    application::{
        dto::AuthenticatedUser,
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        like::{Like, LikeRepository},
        pastry::{PastryId, PastryReadRepository},
        user::UserId,
    },
};

pub struct LikeCommandService {
    likes: Arc<dyn LikeRepository>,
    pastries: Arc<dyn PastryReadRepository>,
    clock: Arc<dyn Clock>,
}

impl LikeCommandService {
    pub fn new(
        likes: Arc<dyn LikeRepository>,
        pastries: Arc<dyn PastryReadRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            likes,
            pastries,
            clock,
        }
    }

    pub async fn create_like(
        &self,
        actor: &AuthenticatedUser,
        pastry_id: PastryId,
    ) -> ApplicationResult<()> {
        let like = self.guarded_like(actor, pastry_id).await?;
        if self.likes.exists(like).await? {
            return Err(ApplicationError::conflict("pastry already liked"));
        }

        self.likes.insert(like, self.clock.now()).await?;
        tracing::info!(pastry_id = %pastry_id, user_id = %actor.id, "pastry liked");
        Ok(())
    }

    pub async fn delete_like(
        &self,
        actor: &AuthenticatedUser,
        pastry_id: PastryId,
    ) -> ApplicationResult<()> {
        let like = self.guarded_like(actor, pastry_id).await?;
        if !self.likes.delete(like).await? {
            return Err(ApplicationError::conflict("pastry is not liked"));
        }

        tracing::info!(pastry_id = %pastry_id, user_id = %actor.id, "pastry unliked");
        Ok(())
    }

    pub async fn is_liked(&self, pastry_id: PastryId, user_id: UserId) -> ApplicationResult<bool> {
        Ok(self.likes.exists(Like::new(pastry_id, user_id)).await?)
    }

    /// NotFound when the listing is absent, Forbidden when the actor owns it.
    async fn guarded_like(
        &self,
        actor: &AuthenticatedUser,
        pastry_id: PastryId,
    ) -> ApplicationResult<Like> {
        let owner = self
            .pastries
            .owner_of(pastry_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("pastry not found"))?;

        if owner == actor.id {
            return Err(ApplicationError::forbidden("cannot like your own pastry"));
        }

        Ok(Like::new(pastry_id, actor.id))
    }
}
