// src/infrastructure/geolocation.rs
use crate::{
    application::{
        error::{ApplicationError, ApplicationResult},
        ports::geolocation::{GeolocationDetails, GeolocationLevel, GeolocationProvider},
    },
    domain::pastry::GeoPoint,
};
use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CACHE_CAPACITY: u64 = 10_000;
/// Five decimal places, roughly one metre.
const COORDINATE_SCALE: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    lat: i64,
    lng: i64,
    level: GeolocationLevel,
}

impl CacheKey {
    #[allow(clippy::cast_possible_truncation)]
    fn new(point: GeoPoint, level: GeolocationLevel) -> Self {
        Self {
            lat: (point.lat() * COORDINATE_SCALE).round() as i64,
            lng: (point.lng() * COORDINATE_SCALE).round() as i64,
            level,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    results: Vec<ReverseResult>,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    formatted: Option<String>,
    country: Option<String>,
    state: Option<String>,
    city: Option<String>,
    street: Option<String>,
    postcode: Option<String>,
}

impl ReverseResponse {
    fn into_details(self) -> ApplicationResult<GeolocationDetails> {
        let first = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ApplicationError::infrastructure("geolocation returned no results"))?;

        let formatted = first
            .formatted
            .or_else(|| first.city.clone())
            .or_else(|| first.country.clone())
            .unwrap_or_default();

        Ok(GeolocationDetails {
            formatted,
            country: first.country,
            state: first.state,
            city: first.city,
            street: first.street,
            postcode: first.postcode,
        })
    }
}

/// Reverse geocoding over HTTP (Geoapify API shape) with a TTL cache in
/// front of it.
#[derive(Clone)]
pub struct HttpGeolocationProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    cache: Cache<CacheKey, GeolocationDetails>,
}

impl HttpGeolocationProvider {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        cache_ttl: Duration,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(cache_ttl)
            .build();

        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            cache,
        }
    }

    async fn fetch(
        &self,
        point: GeoPoint,
        level: GeolocationLevel,
    ) -> ApplicationResult<GeolocationDetails> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lat", point.lat().to_string()),
                ("lon", point.lng().to_string()),
                ("type", level.as_str().to_string()),
                ("format", "json".to_string()),
                ("apiKey", self.api_key.clone()),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| ApplicationError::infrastructure(format!("geolocation request: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::infrastructure(format!(
                "geolocation service responded with {status}"
            )));
        }

        response
            .json::<ReverseResponse>()
            .await
            .map_err(|err| ApplicationError::infrastructure(format!("geolocation payload: {err}")))?
            .into_details()
    }
}

#[async_trait]
impl GeolocationProvider for HttpGeolocationProvider {
    async fn lookup(
        &self,
        point: GeoPoint,
        level: GeolocationLevel,
    ) -> ApplicationResult<GeolocationDetails> {
        let key = CacheKey::new(point, level);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(lat = point.lat(), lng = point.lng(), level = level.as_str(), "geolocation cache hit");
            return Ok(cached);
        }

        let details = self.fetch(point, level).await?;
        self.cache.insert(key, details.clone()).await;
        Ok(details)
    }
}
