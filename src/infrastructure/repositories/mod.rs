// src/infrastructure/repositories/mod.rs
mod error;
mod pastry_sql;
mod postgres_follow;
mod postgres_like;
mod postgres_pastry;
mod postgres_refresh_token;
mod postgres_user;

pub use error::map_sqlx;
pub use postgres_follow::PostgresFollowRepository;
pub use postgres_like::PostgresLikeRepository;
pub use postgres_pastry::PostgresPastryRepository;
pub use postgres_refresh_token::PostgresRefreshTokenRepository;
pub use postgres_user::PostgresUserRepository;
