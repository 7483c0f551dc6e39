use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::pastry::{
        Category, GeoFilter, GeoPoint, OrderBy, PageLimit, Pagination, PastryId, PastryOrder,
        PastrySearch, Price, PriceRange, RadiusKm, SearchFilters, SortDirection,
    },
};
use std::collections::BTreeSet;

/// The three geolocation parameters as received; all or none must be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoCriteria {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
}

/// Listing search parameters before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub geolocation: GeoCriteria,
    pub order_by: Option<String>,
    pub order: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

impl SearchCriteria {
    pub fn into_search(self) -> ApplicationResult<PastrySearch> {
        let categories = self
            .categories
            .iter()
            .map(|raw| raw.parse::<Category>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        let price = match (self.price_min, self.price_max) {
            (None, None) => None,
            (min, max) => Some(PriceRange::new(
                min.map(Price::new).transpose()?.unwrap_or(Price::ZERO),
                max.map(Price::new).transpose()?,
            )?),
        };

        let geolocation = match (
            self.geolocation.lat,
            self.geolocation.lng,
            self.geolocation.radius,
        ) {
            (None, None, None) => None,
            (Some(lat), Some(lng), Some(radius)) => Some(GeoFilter::new(
                GeoPoint::new(lat, lng)?,
                RadiusKm::new(radius)?,
            )),
            _ => {
                return Err(ApplicationError::validation(
                    "geolocation requires lat, lng and radius together",
                ));
            }
        };

        let by = self
            .order_by
            .as_deref()
            .map(str::parse::<OrderBy>)
            .transpose()?
            .unwrap_or_default();
        let direction = self
            .order
            .as_deref()
            .map(str::parse::<SortDirection>)
            .transpose()?
            .unwrap_or_default();

        let cursor = self
            .cursor
            .as_deref()
            .map(str::parse::<PastryId>)
            .transpose()?;
        let limit = self
            .limit
            .map(PageLimit::new)
            .transpose()?
            .unwrap_or_default();

        Ok(PastrySearch {
            filters: SearchFilters {
                search: self.search,
                categories,
                price,
                geolocation,
            },
            order: PastryOrder::new(by, direction),
            pagination: Pagination::new(cursor, limit),
        })
    }
}
