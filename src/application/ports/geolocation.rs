// src/application/ports/geolocation.rs
use crate::{application::ApplicationResult, domain::pastry::GeoPoint};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Granularity of a reverse lookup, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationLevel {
    Country,
    State,
    #[default]
    City,
    Street,
    Building,
}

impl GeolocationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::State => "state",
            Self::City => "city",
            Self::Street => "street",
            Self::Building => "building",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeolocationDetails {
    pub formatted: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub postcode: Option<String>,
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn lookup(
        &self,
        point: GeoPoint,
        level: GeolocationLevel,
    ) -> ApplicationResult<GeolocationDetails>;
}
