use super::{
    PastryCommandService,
    media::{MAX_MEDIA_PER_PASTRY, validate_uploads},
};
use crate::{
    application::{
        dto::{AuthenticatedUser, OwnerPastryDto},
        error::{ApplicationError, ApplicationResult},
        ports::media_storage::MediaUpload,
    },
    domain::{
        errors::DomainResult,
        pastry::{Category, GeoPoint, NewPastry, PastryName, Price, Unit},
        user::PhoneNumber,
    },
};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationInput {
    pub lat: f64,
    pub lng: f64,
}

impl LocationInput {
    pub(super) fn into_point(self) -> DomainResult<GeoPoint> {
        GeoPoint::new(self.lat, self.lng)
    }
}

pub(super) fn parse_categories(raw: &[String]) -> DomainResult<BTreeSet<Category>> {
    raw.iter().map(|tag| tag.parse::<Category>()).collect()
}

pub struct CreatePastryCommand {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub unit: String,
    pub categories: Vec<String>,
    pub contact_phone: String,
    pub geolocation: Option<LocationInput>,
    pub media: Vec<MediaUpload>,
}

impl PastryCommandService {
    pub async fn create(
        &self,
        owner: &AuthenticatedUser,
        command: CreatePastryCommand,
    ) -> ApplicationResult<OwnerPastryDto> {
        if command.media.len() > MAX_MEDIA_PER_PASTRY {
            return Err(ApplicationError::validation(format!(
                "at most {MAX_MEDIA_PER_PASTRY} media files are allowed"
            )));
        }
        validate_uploads(&command.media)?;

        let name = PastryName::new(command.name)?;
        let price = Price::new(command.price)?;
        let unit = Unit::new(command.unit)?;
        let categories = parse_categories(&command.categories)?;
        let contact_phone = PhoneNumber::new(command.contact_phone)?;
        let geolocation = command
            .geolocation
            .map(LocationInput::into_point)
            .transpose()?;

        let stored = self.store_uploads(command.media).await?;
        let new_pastry = NewPastry {
            owner_id: owner.id,
            name,
            description: command.description.trim().to_string(),
            price,
            unit,
            categories,
            contact_phone,
            geolocation,
            media: stored.clone(),
            created_at: self.clock.now(),
        };

        let pastry = match self.write_repo.create(new_pastry).await {
            Ok(pastry) => pastry,
            Err(err) => {
                self.discard_files(&stored).await;
                return Err(err.into());
            }
        };

        tracing::info!(pastry_id = %pastry.id, owner_id = %owner.id, "pastry created");
        Ok(self.presenter.owner_view(pastry).await)
    }
}
