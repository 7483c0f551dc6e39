// src/domain/mod.rs
pub mod errors;
pub mod follow;
pub mod like;
pub mod pastry;
pub mod user;
