use std::sync::Arc;

use crate::{
    application::{
        dto::{AuthenticatedUser, UserProfileDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{follow::FollowRepository, user::UserRepository},
};

pub struct UserQueryService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl UserQueryService {
    pub fn new(users: Arc<dyn UserRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { users, follows }
    }

    pub async fn profile(&self, auth: &AuthenticatedUser) -> ApplicationResult<UserProfileDto> {
        let user = self
            .users
            .find_by_id(auth.id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("user not found"))?;
        let counts = self.follows.counts(user.id).await?;
        Ok(UserProfileDto::from_parts(user, counts, auth.expires_at))
    }
}
