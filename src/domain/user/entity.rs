// src/domain/user/entity.rs
use crate::domain::user::value_objects::{Email, PasswordHash, PhoneNumber, UserId, Username};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub password_hash: PasswordHash,
    pub phone: Option<PhoneNumber>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub password_hash: PasswordHash,
    pub phone: Option<PhoneNumber>,
    pub created_at: DateTime<Utc>,
}
