use super::{
    PastryCommandService,
    create::{LocationInput, parse_categories},
    media::{MAX_MEDIA_PER_PASTRY, validate_uploads},
};
use crate::{
    application::{
        dto::{AuthenticatedUser, OwnerPastryDto},
        error::{ApplicationError, ApplicationResult},
        ports::media_storage::MediaUpload,
    },
    domain::{
        pastry::{MediaId, Pastry, PastryId, PastryName, PastryUpdate, Price, Unit},
        user::PhoneNumber,
    },
};
use std::collections::HashSet;
use uuid::Uuid;

/// Partial update; `None` leaves a field unchanged.
#[derive(Default)]
pub struct UpdatePastryCommand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub categories: Option<Vec<String>>,
    pub contact_phone: Option<String>,
    pub geolocation: Option<LocationInput>,
    pub removed_media: Vec<Uuid>,
    pub media: Vec<MediaUpload>,
}

impl PastryCommandService {
    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: PastryId,
        command: UpdatePastryCommand,
    ) -> ApplicationResult<OwnerPastryDto> {
        let current = self
            .read_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("pastry not found"))?;
        if !current.is_owned_by(actor.id) {
            return Err(ApplicationError::forbidden(
                "only the owner can update this pastry",
            ));
        }

        validate_uploads(&command.media)?;
        let removed: Vec<MediaId> = command
            .removed_media
            .iter()
            .copied()
            .collect::<HashSet<Uuid>>()
            .into_iter()
            .map(MediaId::new)
            .collect();
        ensure_media_capacity(&current, &removed, command.media.len())?;

        let mut update = self.build_update(id, &command)?;
        let added = self.store_uploads(command.media).await?;
        update = update.with_removed_media(removed).with_added_media(added.clone());

        let outcome = match self.write_repo.update(update).await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.discard_files(&added).await;
                return Err(err.into());
            }
        };

        // Committed; the old files are no longer referenced. A failed removal
        // leaves an orphan on disk.
        self.discard_files(&outcome.removed_filenames).await;

        tracing::info!(pastry_id = %id, owner_id = %actor.id, "pastry updated");
        Ok(self.presenter.owner_view(outcome.pastry).await)
    }

    fn build_update(
        &self,
        id: PastryId,
        command: &UpdatePastryCommand,
    ) -> ApplicationResult<PastryUpdate> {
        let mut update = PastryUpdate::new(id, self.clock.now());
        if let Some(name) = &command.name {
            update = update.with_name(PastryName::new(name.clone())?);
        }
        if let Some(description) = &command.description {
            update = update.with_description(description.trim().to_string());
        }
        if let Some(price) = command.price {
            update = update.with_price(Price::new(price)?);
        }
        if let Some(unit) = &command.unit {
            update = update.with_unit(Unit::new(unit.clone())?);
        }
        if let Some(categories) = &command.categories {
            update = update.with_categories(parse_categories(categories)?);
        }
        if let Some(phone) = &command.contact_phone {
            update = update.with_contact_phone(PhoneNumber::new(phone.clone())?);
        }
        if let Some(location) = command.geolocation {
            update = update.with_geolocation(location.into_point()?);
        }
        Ok(update)
    }
}

fn ensure_media_capacity(
    current: &Pastry,
    removed: &[MediaId],
    added: usize,
) -> ApplicationResult<()> {
    if let Some(unknown) = removed
        .iter()
        .find(|id| !current.media.iter().any(|media| media.id == **id))
    {
        return Err(ApplicationError::not_found(format!(
            "media {} not found on this pastry",
            Uuid::from(*unknown)
        )));
    }

    let remaining = current.media.len() - removed.len().min(current.media.len());
    if remaining + added > MAX_MEDIA_PER_PASTRY {
        return Err(ApplicationError::validation(format!(
            "at most {MAX_MEDIA_PER_PASTRY} media files are allowed"
        )));
    }
    Ok(())
}
