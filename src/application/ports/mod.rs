// src/application/ports/mod.rs
pub mod geolocation;
pub mod media_storage;
pub mod security;
pub mod time;

pub type PasswordHasherPort = dyn security::PasswordHasher;
pub type TokenManagerPort = dyn security::TokenManager;
pub type ClockPort = dyn time::Clock;
pub type GeolocationPort = dyn geolocation::GeolocationProvider;
pub type MediaStoragePort = dyn media_storage::MediaStorage;
