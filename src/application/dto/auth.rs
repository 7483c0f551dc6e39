use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::serde_time;

/// Token pair returned by register, login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenDto {
    pub access_token: String,
    pub token_type: String,
    #[serde(with = "serde_time")]
    pub issued_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
    pub refresh_token: String,
    #[serde(with = "serde_time")]
    pub refresh_expires_at: DateTime<Utc>,
}

impl AuthTokenDto {
    pub fn from_pair(access: IssuedToken, refresh: IssuedToken) -> Self {
        let expires_in = access
            .expires_at
            .signed_duration_since(access.issued_at)
            .num_seconds()
            .max(0);
        Self {
            access_token: access.token,
            token_type: "Bearer".to_string(),
            issued_at: access.issued_at,
            expires_at: access.expires_at,
            expires_in,
            refresh_token: refresh.token,
            refresh_expires_at: refresh.expires_at,
        }
    }
}

/// A signed token together with its validity window.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: UserId,
    pub username: String,
}

/// Claims carried by a refresh token whose signature has been verified.
/// Expiry is reported, not enforced.
#[derive(Debug, Clone)]
pub struct RefreshClaims {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}
