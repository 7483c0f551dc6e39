use crate::domain::pastry::{Category, Pastry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaDto {
    pub id: Uuid,
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeolocationDto {
    pub lat: f64,
    pub lng: f64,
    /// Human-readable address resolved by the geolocation provider, absent
    /// when the lookup failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

/// Fields every reader of a listing sees.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PastryDto {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub unit: String,
    pub categories: Vec<Category>,
    pub contact_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<GeolocationDto>,
    pub media: Vec<MediaDto>,
    pub like_count: u64,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
}

impl PastryDto {
    pub fn from_pastry(
        pastry: Pastry,
        formatted_address: Option<String>,
        media_url: impl Fn(&str) -> String,
    ) -> Self {
        let media = pastry
            .media
            .into_iter()
            .map(|item| MediaDto {
                id: item.id.into(),
                url: media_url(&item.filename),
                filename: item.filename,
            })
            .collect();

        Self {
            id: pastry.id.into(),
            owner_id: pastry.owner_id.into(),
            name: pastry.name.into(),
            description: pastry.description,
            price: pastry.price.value(),
            unit: pastry.unit.into(),
            categories: pastry.categories.into_iter().collect(),
            contact_phone: pastry.contact_phone.into(),
            geolocation: pastry.geolocation.map(|point| GeolocationDto {
                lat: point.lat(),
                lng: point.lng(),
                formatted: formatted_address,
            }),
            media,
            like_count: pastry.like_count,
            created_at: pastry.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerPastryDto {
    #[serde(flatten)]
    pub pastry: PastryDto,
    #[serde(with = "serde_time")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicPastryDto {
    #[serde(flatten)]
    pub pastry: PastryDto,
    pub is_liked: bool,
}

/// A listing as seen by its owner or by anyone else.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum PastryView {
    Owner(OwnerPastryDto),
    Public(PublicPastryDto),
}

impl PastryView {
    pub fn pastry(&self) -> &PastryDto {
        match self {
            Self::Owner(view) => &view.pastry,
            Self::Public(view) => &view.pastry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        pastry::{GeoPoint, MediaId, PastryId, PastryMedia, PastryName, Price, Unit},
        user::{PhoneNumber, UserId},
    };
    use chrono::TimeZone;

    fn sample() -> Pastry {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Pastry {
            id: PastryId::generate(),
            owner_id: UserId::generate(),
            name: PastryName::new("Lemon tart").unwrap(),
            description: "Fresh".into(),
            price: Price::new(3.5).unwrap(),
            unit: Unit::new("slice").unwrap(),
            categories: [Category::Tart].into_iter().collect(),
            contact_phone: PhoneNumber::new("+34600111222").unwrap(),
            geolocation: Some(GeoPoint::new(41.38, 2.17).unwrap()),
            media: vec![PastryMedia {
                id: MediaId::new(Uuid::new_v4()),
                filename: "tart.jpg".into(),
            }],
            created_at: at,
            updated_at: at,
            like_count: 2,
        }
    }

    #[test]
    fn public_view_is_tagged_and_flattened() {
        let dto = PastryDto::from_pastry(sample(), Some("Barcelona".into()), |name| {
            format!("/uploads/{name}")
        });
        let view = PastryView::Public(PublicPastryDto {
            pastry: dto,
            is_liked: true,
        });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["view"], "public");
        assert_eq!(json["isLiked"], true);
        assert_eq!(json["likeCount"], 2);
        assert_eq!(json["categories"][0], "tart");
        assert_eq!(json["media"][0]["url"], "/uploads/tart.jpg");
        assert_eq!(json["geolocation"]["formatted"], "Barcelona");
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn owner_view_exposes_update_time() {
        let pastry = sample();
        let updated_at = pastry.updated_at;
        let view = PastryView::Owner(OwnerPastryDto {
            pastry: PastryDto::from_pastry(pastry, None, str::to_string),
            updated_at,
        });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["view"], "owner");
        assert_eq!(json["updatedAt"], "2024-01-01T00:00:00.000Z");
        assert!(json["geolocation"].get("formatted").is_none());
        assert!(json.get("isLiked").is_none());
    }
}
