use std::sync::Arc;

use crate::{
    application::{
        dto::AuthenticatedUser,
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        follow::{Follow, FollowCounts, FollowRepository},
        user::{UserId, UserRepository},
    },
};

pub struct FollowCommandService {
    follows: Arc<dyn FollowRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl FollowCommandService {
    pub fn new(
        follows: Arc<dyn FollowRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            follows,
            users,
            clock,
        }
    }

    pub async fn follow(&self, actor: &AuthenticatedUser, target: UserId) -> ApplicationResult<()> {
        let follow = self
            .guarded_follow(Follow::new(actor.id, target), target)
            .await?;
        if self.follows.exists(follow).await? {
            return Err(ApplicationError::conflict("already following this user"));
        }

        self.follows.insert(follow, self.clock.now()).await?;
        tracing::info!(follower = %actor.id, following = %target, "user followed");
        Ok(())
    }

    pub async fn unfollow(
        &self,
        actor: &AuthenticatedUser,
        target: UserId,
    ) -> ApplicationResult<()> {
        let follow = self
            .guarded_follow(Follow::new(actor.id, target), target)
            .await?;
        if !self.follows.delete(follow).await? {
            return Err(ApplicationError::conflict("not following this user"));
        }

        tracing::info!(follower = %actor.id, following = %target, "user unfollowed");
        Ok(())
    }

    /// Remove `follower` from the actor's followers.
    pub async fn unfollow_from_you(
        &self,
        actor: &AuthenticatedUser,
        follower: UserId,
    ) -> ApplicationResult<()> {
        let follow = self
            .guarded_follow(Follow::new(follower, actor.id), follower)
            .await?;
        if !self.follows.delete(follow).await? {
            return Err(ApplicationError::conflict("this user does not follow you"));
        }

        tracing::info!(follower = %follower, following = %actor.id, "follower removed");
        Ok(())
    }

    pub async fn is_following(
        &self,
        follower: UserId,
        following: UserId,
    ) -> ApplicationResult<bool> {
        Ok(self
            .follows
            .exists(Follow::new(follower, following))
            .await?)
    }

    pub async fn counts(&self, user_id: UserId) -> ApplicationResult<FollowCounts> {
        Ok(self.follows.counts(user_id).await?)
    }

    /// Forbidden on a self-relation, NotFound when `other` does not exist.
    async fn guarded_follow(&self, follow: Follow, other: UserId) -> ApplicationResult<Follow> {
        if follow.is_self_follow() {
            return Err(ApplicationError::forbidden("cannot follow yourself"));
        }

        if !self.users.exists(other).await? {
            return Err(ApplicationError::not_found("user not found"));
        }

        Ok(follow)
    }
}
