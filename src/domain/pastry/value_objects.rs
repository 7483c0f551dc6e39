use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PastryId(Uuid);

impl PastryId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for PastryId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<PastryId> for Uuid {
    fn from(value: PastryId) -> Self {
        value.0
    }
}

impl FromStr for PastryId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::Validation("invalid pastry id".into()))
    }
}

impl fmt::Display for PastryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(Uuid);

impl MediaId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for MediaId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<MediaId> for Uuid {
    fn from(value: MediaId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastryName(String);

impl PastryName {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation("name cannot be empty".into()));
        }
        if trimmed.chars().count() > 120 {
            return Err(DomainError::Validation(
                "name must be at most 120 characters long".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PastryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PastryName> for String {
    fn from(value: PastryName) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub const ZERO: Price = Price(0.0);

    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::Validation("price must be a finite number".into()));
        }
        if value < 0.0 {
            return Err(DomainError::Validation("price cannot be negative".into()));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// Selling unit such as "piece", "kg" or "box of 6".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit(String);

impl Unit {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation("unit cannot be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Unit> for String {
    fn from(value: Unit) -> Self {
        value.0
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cake,
    Cookie,
    Croissant,
    Cupcake,
    Donut,
    Macaron,
    Pie,
    Tart,
    Bread,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Cake,
        Category::Cookie,
        Category::Croissant,
        Category::Cupcake,
        Category::Donut,
        Category::Macaron,
        Category::Pie,
        Category::Tart,
        Category::Bread,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cake => "cake",
            Category::Cookie => "cookie",
            Category::Croissant => "croissant",
            Category::Cupcake => "cupcake",
            Category::Donut => "donut",
            Category::Macaron => "macaron",
            Category::Pie => "pie",
            Category::Tart => "tart",
            Category::Bread => "bread",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == needle)
            .ok_or_else(|| DomainError::Validation(format!("unknown category '{s}'")))
    }
}
