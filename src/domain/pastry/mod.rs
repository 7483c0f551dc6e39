pub mod entity;
pub mod geo;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod similarity;
pub mod value_objects;

pub use entity::{NewPastry, Pastry, PastryMedia, PastryUpdate, PastryUpdateOutcome};
pub use geo::{BoundingBox, GeoPoint, RadiusKm};
pub use pagination::{PageLimit, Pagination, SliceDirective};
pub use query::{
    GeoFilter, OrderBy, PastryCondition, PastryOrder, PastryQuery, PastrySearch, PriceRange,
    SearchFilters, SortDirection,
};
pub use repository::{PastryReadRepository, PastryWriteRepository};
pub use value_objects::{Category, MediaId, PastryId, PastryName, Price, Unit};
