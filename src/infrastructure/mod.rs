// src/infrastructure/mod.rs
pub mod database;
pub mod geolocation;
pub mod repositories;
pub mod security;
pub mod storage;
pub mod sweeper;
pub mod time;
