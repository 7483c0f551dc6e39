//! Declarative description of a pastry search.
//!
//! Filters, ordering and pagination are combined into one [`PastryQuery`].
//! The repository renders it into SQL; [`PastryCondition::matches`] and
//! [`PastryOrder::compare`] give the same semantics in memory.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::pastry::{
    entity::Pastry,
    geo::{BoundingBox, GeoPoint, RadiusKm},
    pagination::{Pagination, SliceDirective},
    value_objects::{Category, PastryId, Price},
};
use std::{cmp::Ordering, collections::BTreeSet, str::FromStr};

/// Inclusive price bounds; `max = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: Price,
    max: Option<Price>,
}

impl PriceRange {
    pub fn new(min: Price, max: Option<Price>) -> DomainResult<Self> {
        if let Some(max) = max {
            if max < min {
                return Err(DomainError::Validation(
                    "price max must not be lower than price min".into(),
                ));
            }
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Price {
        self.min
    }

    pub fn max(&self) -> Option<Price> {
        self.max
    }

    pub fn contains(&self, price: Price) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Price::ZERO,
            max: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFilter {
    pub center: GeoPoint,
    pub radius: RadiusKm,
}

impl GeoFilter {
    pub fn new(center: GeoPoint, radius: RadiusKm) -> Self {
        Self { center, radius }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(self.center, self.radius)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub search: Option<String>,
    pub categories: BTreeSet<Category>,
    pub price: Option<PriceRange>,
    pub geolocation: Option<GeoFilter>,
}

impl SearchFilters {
    fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderBy {
    Price,
    CreatedAt,
    /// Number of likes, computed at query time.
    #[default]
    Popularity,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Price => "price",
            OrderBy::CreatedAt => "createdAt",
            OrderBy::Popularity => "popularity",
        }
    }
}

impl FromStr for OrderBy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(OrderBy::Price),
            "createdAt" => Ok(OrderBy::CreatedAt),
            "popularity" => Ok(OrderBy::Popularity),
            other => Err(DomainError::Validation(format!(
                "orderBy must be one of price, createdAt, popularity (got '{other}')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(DomainError::Validation(format!(
                "order must be asc or desc (got '{other}')"
            ))),
        }
    }
}

/// Defaults to popularity ascending, i.e. least liked first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PastryOrder {
    pub by: OrderBy,
    pub direction: SortDirection,
}

impl PastryOrder {
    pub fn new(by: OrderBy, direction: SortDirection) -> Self {
        Self { by, direction }
    }

    /// Total order: the sort key first, then the id in the same direction.
    pub fn compare(&self, a: &Pastry, b: &Pastry) -> Ordering {
        let key = match self.by {
            OrderBy::Price => a.price.value().total_cmp(&b.price.value()),
            OrderBy::CreatedAt => a.created_at.cmp(&b.created_at),
            OrderBy::Popularity => a.like_count.cmp(&b.like_count),
        };
        let ordering = key.then_with(|| a.id.cmp(&b.id));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PastrySearch {
    pub filters: SearchFilters,
    pub order: PastryOrder,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PastryCondition {
    /// Conjunction; empty matches everything.
    All(Vec<PastryCondition>),
    /// Disjunction; empty matches nothing.
    Any(Vec<PastryCondition>),
    /// Case-insensitive substring match on the name.
    NameContains(String),
    /// At least one of the categories.
    CategoryIn(BTreeSet<Category>),
    PriceBetween { min: Price, max: Option<Price> },
    WithinBox(BoundingBox),
    NotId(PastryId),
}

impl PastryCondition {
    pub fn match_all() -> Self {
        PastryCondition::All(Vec::new())
    }

    /// AND-combine every supplied filter. Absent filters add no constraint.
    pub fn from_filters(filters: &SearchFilters) -> Self {
        PastryCondition::All(Self::filter_terms(filters))
    }

    pub(crate) fn filter_terms(filters: &SearchFilters) -> Vec<PastryCondition> {
        let mut terms = Vec::new();

        if let Some(text) = filters.search_text() {
            terms.push(PastryCondition::NameContains(text.to_lowercase()));
        }
        if !filters.categories.is_empty() {
            terms.push(PastryCondition::CategoryIn(filters.categories.clone()));
        }
        if let Some(range) = filters.price {
            terms.push(PastryCondition::PriceBetween {
                min: range.min(),
                max: range.max(),
            });
        }
        if let Some(geo) = filters.geolocation {
            terms.push(PastryCondition::WithinBox(geo.bounding_box()));
        }

        terms
    }

    pub fn matches(&self, pastry: &Pastry) -> bool {
        match self {
            PastryCondition::All(terms) => terms.iter().all(|term| term.matches(pastry)),
            PastryCondition::Any(terms) => terms.iter().any(|term| term.matches(pastry)),
            PastryCondition::NameContains(needle) => pastry
                .name
                .as_str()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            PastryCondition::CategoryIn(categories) => {
                !pastry.categories.is_disjoint(categories)
            }
            PastryCondition::PriceBetween { min, max } => {
                pastry.price >= *min && max.is_none_or(|max| pastry.price <= max)
            }
            PastryCondition::WithinBox(bbox) => pastry
                .geolocation
                .as_ref()
                .is_some_and(|point| bbox.contains(point)),
            PastryCondition::NotId(id) => pastry.id != *id,
        }
    }
}

/// Everything a repository needs to produce one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PastryQuery {
    pub condition: PastryCondition,
    pub order: PastryOrder,
    pub slice: SliceDirective,
}

impl PastryQuery {
    pub fn for_search(search: &PastrySearch) -> Self {
        Self {
            condition: PastryCondition::from_filters(&search.filters),
            order: search.order,
            slice: search.pagination.slice(),
        }
    }

    /// Evaluate the query over an in-memory collection.
    pub fn evaluate(&self, rows: impl IntoIterator<Item = Pastry>) -> Vec<Pastry> {
        let mut matching: Vec<Pastry> = rows
            .into_iter()
            .filter(|pastry| self.condition.matches(pastry))
            .collect();
        matching.sort_by(|a, b| self.order.compare(a, b));
        self.slice.apply(matching, |pastry| pastry.id)
    }
}
