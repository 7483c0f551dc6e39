// src/presentation/http/controllers/mod.rs
pub mod auth;
pub mod follows;
pub mod likes;
pub mod pastries;
