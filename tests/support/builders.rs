// tests/support/builders.rs
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use pastry_market::application::{
    commands::pastries::{CreatePastryCommand, LocationInput},
    ports::media_storage::MediaUpload,
};
use pastry_market::domain::pastry::{
    Category, GeoPoint, Pastry, PastryId, PastryName, Price, Unit,
};
use pastry_market::domain::user::{PhoneNumber, UserId};

use super::mocks::BASE_TIME;

pub fn image(name: &str) -> MediaUpload {
    MediaUpload {
        original_name: name.to_string(),
        content_type: Some("image/jpeg".to_string()),
        bytes: Bytes::from_static(b"\xff\xd8\xff\xe0fake-jpeg"),
    }
}

/// Create command with sensible defaults.
pub struct CreatePastryBuilder {
    command: CreatePastryCommand,
}

impl CreatePastryBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            command: CreatePastryCommand {
                name: name.to_string(),
                description: format!("Homemade {name}"),
                price: 4.5,
                unit: "piece".to_string(),
                categories: Vec::new(),
                contact_phone: "+34 600 111 222".to_string(),
                geolocation: None,
                media: Vec::new(),
            },
        }
    }

    pub fn price(mut self, price: f64) -> Self {
        self.command.price = price;
        self
    }

    pub fn categories(mut self, categories: &[&str]) -> Self {
        self.command.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.command.geolocation = Some(LocationInput { lat, lng });
        self
    }

    pub fn media(mut self, upload: MediaUpload) -> Self {
        self.command.media.push(upload);
        self
    }

    pub fn build(self) -> CreatePastryCommand {
        self.command
    }
}

/// Listing seeded straight into the store.
pub struct PastryBuilder {
    pastry: Pastry,
}

impl PastryBuilder {
    pub fn new(owner: UserId, name: &str) -> Self {
        let at: DateTime<Utc> = *BASE_TIME;
        Self {
            pastry: Pastry {
                id: PastryId::generate(),
                owner_id: owner,
                name: PastryName::new(name).unwrap(),
                description: String::new(),
                price: Price::new(1.0).unwrap(),
                unit: Unit::new("piece").unwrap(),
                categories: Default::default(),
                contact_phone: PhoneNumber::new("+34600111222").unwrap(),
                geolocation: None,
                media: Vec::new(),
                created_at: at,
                updated_at: at,
                like_count: 0,
            },
        }
    }

    pub fn price(mut self, price: f64) -> Self {
        self.pastry.price = Price::new(price).unwrap();
        self
    }

    pub fn categories(mut self, categories: &[Category]) -> Self {
        self.pastry.categories = categories.iter().copied().collect();
        self
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.pastry.geolocation = Some(GeoPoint::new(lat, lng).unwrap());
        self
    }

    pub fn created_minutes_after_base(mut self, minutes: i64) -> Self {
        self.pastry.created_at = *BASE_TIME + Duration::minutes(minutes);
        self.pastry.updated_at = self.pastry.created_at;
        self
    }

    pub fn build(self) -> Pastry {
        self.pastry
    }
}
