// src/domain/user/mod.rs
pub mod entity;
pub mod refresh_token;
pub mod repository;
pub mod value_objects;

pub use entity::{NewUser, User};
pub use refresh_token::{NewRefreshToken, RefreshTokenRecord, RefreshTokenRepository};
pub use repository::UserRepository;
pub use value_objects::{Email, PasswordHash, PhoneNumber, UserId, Username};
