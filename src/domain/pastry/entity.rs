// src/domain/pastry/entity.rs
use crate::domain::pastry::geo::GeoPoint;
use crate::domain::pastry::value_objects::{
    Category, MediaId, PastryId, PastryName, Price, Unit,
};
use crate::domain::user::{PhoneNumber, UserId};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastryMedia {
    pub id: MediaId,
    pub filename: String,
}

/// Read model of a listing. `like_count` is derived from the likes table.
#[derive(Debug, Clone)]
pub struct Pastry {
    pub id: PastryId,
    pub owner_id: UserId,
    pub name: PastryName,
    pub description: String,
    pub price: Price,
    pub unit: Unit,
    pub categories: BTreeSet<Category>,
    pub contact_phone: PhoneNumber,
    pub geolocation: Option<GeoPoint>,
    pub media: Vec<PastryMedia>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub like_count: u64,
}

impl Pastry {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewPastry {
    pub owner_id: UserId,
    pub name: PastryName,
    pub description: String,
    pub price: Price,
    pub unit: Unit,
    pub categories: BTreeSet<Category>,
    pub contact_phone: PhoneNumber,
    pub geolocation: Option<GeoPoint>,
    /// Stored filenames, in display order.
    pub media: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PastryUpdate {
    pub id: PastryId,
    pub name: Option<PastryName>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub unit: Option<Unit>,
    pub categories: Option<BTreeSet<Category>>,
    pub contact_phone: Option<PhoneNumber>,
    pub geolocation: Option<GeoPoint>,
    pub added_media: Vec<String>,
    pub removed_media: Vec<MediaId>,
    pub updated_at: DateTime<Utc>,
}

impl PastryUpdate {
    pub fn new(id: PastryId, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: None,
            description: None,
            price: None,
            unit: None,
            categories: None,
            contact_phone: None,
            geolocation: None,
            added_media: Vec::new(),
            removed_media: Vec::new(),
            updated_at,
        }
    }

    pub fn with_name(mut self, name: PastryName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_categories(mut self, categories: BTreeSet<Category>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn with_contact_phone(mut self, phone: PhoneNumber) -> Self {
        self.contact_phone = Some(phone);
        self
    }

    pub fn with_geolocation(mut self, point: GeoPoint) -> Self {
        self.geolocation = Some(point);
        self
    }

    pub fn with_added_media(mut self, filenames: Vec<String>) -> Self {
        self.added_media = filenames;
        self
    }

    pub fn with_removed_media(mut self, ids: Vec<MediaId>) -> Self {
        self.removed_media = ids;
        self
    }
}

/// Result of a committed update; `removed_filenames` are the files that are
/// no longer referenced by any row and may be deleted from storage.
#[derive(Debug, Clone)]
pub struct PastryUpdateOutcome {
    pub pastry: Pastry,
    pub removed_filenames: Vec<String>,
}
