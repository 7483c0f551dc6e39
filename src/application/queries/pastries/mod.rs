mod criteria;
mod get_by_id;
mod presenter;
mod search;
mod service;
mod similar;

pub use criteria::{GeoCriteria, SearchCriteria};
pub use get_by_id::GetPastryByIdQuery;
pub use presenter::{ENRICHMENT_LEVEL, PastryPresenter};
pub use search::SearchPastriesQuery;
pub use service::PastryQueryService;
pub use similar::SimilarPastriesQuery;
