use crate::domain::{follow::FollowCounts, user::User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            email: user.email.to_string(),
            username: user.username.to_string(),
            phone: user.phone.map(|phone| phone.to_string()),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub user: UserDto,
    pub followers: u64,
    pub following: u64,
    #[serde(with = "serde_time")]
    pub token_expires_at: DateTime<Utc>,
}

impl UserProfileDto {
    pub fn from_parts(user: User, counts: FollowCounts, token_expires_at: DateTime<Utc>) -> Self {
        Self {
            user: user.into(),
            followers: counts.followers,
            following: counts.following,
            token_expires_at,
        }
    }
}
