use std::{collections::HashSet, sync::Arc};

use crate::{
    application::{
        dto::{OwnerPastryDto, PastryDto, PublicPastryDto},
        ports::{
            geolocation::{GeolocationLevel, GeolocationProvider},
            media_storage::MediaStorage,
        },
    },
    domain::pastry::{Pastry, PastryId},
};

/// Level at which listing locations are resolved for display.
pub const ENRICHMENT_LEVEL: GeolocationLevel = GeolocationLevel::City;

/// Turns stored listings into response DTOs: resolves a display address for
/// the geolocation and a public URL for every media file.
pub struct PastryPresenter {
    geolocation: Arc<dyn GeolocationProvider>,
    storage: Arc<dyn MediaStorage>,
}

impl PastryPresenter {
    pub fn new(geolocation: Arc<dyn GeolocationProvider>, storage: Arc<dyn MediaStorage>) -> Self {
        Self {
            geolocation,
            storage,
        }
    }

    pub async fn present(&self, pastry: Pastry) -> PastryDto {
        let formatted = match pastry.geolocation {
            Some(point) => match self.geolocation.lookup(point, ENRICHMENT_LEVEL).await {
                Ok(details) => Some(details.formatted),
                Err(err) => {
                    tracing::warn!(pastry_id = %pastry.id, error = %err, "geolocation lookup failed");
                    None
                }
            },
            None => None,
        };

        PastryDto::from_pastry(pastry, formatted, |filename| {
            self.storage.public_url(filename)
        })
    }

    pub async fn owner_view(&self, pastry: Pastry) -> OwnerPastryDto {
        let updated_at = pastry.updated_at;
        OwnerPastryDto {
            pastry: self.present(pastry).await,
            updated_at,
        }
    }

    pub async fn public_view(&self, pastry: Pastry, is_liked: bool) -> PublicPastryDto {
        PublicPastryDto {
            pastry: self.present(pastry).await,
            is_liked,
        }
    }

    pub async fn public_page(
        &self,
        page: Vec<Pastry>,
        liked: &HashSet<PastryId>,
    ) -> Vec<PublicPastryDto> {
        let mut items = Vec::with_capacity(page.len());
        for pastry in page {
            let is_liked = liked.contains(&pastry.id);
            items.push(self.public_view(pastry, is_liked).await);
        }
        items
    }
}
