use super::{PastryQueryService, SearchCriteria};
use crate::{
    application::{
        dto::{AuthenticatedUser, CursorPage, PublicPastryDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::pastry::{
        PastryId, PastryQuery, pagination::next_cursor, similarity::rank_by_relevance,
    },
};

pub struct SimilarPastriesQuery {
    pub id: PastryId,
    pub criteria: SearchCriteria,
}

impl PastryQueryService {
    /// Listings sharing a category or a name word with the reference, filtered
    /// like a regular search. The relevance ordering applies within the page.
    pub async fn similar(
        &self,
        requester: Option<&AuthenticatedUser>,
        query: SimilarPastriesQuery,
    ) -> ApplicationResult<CursorPage<PublicPastryDto>> {
        let search = query.criteria.into_search()?;
        let reference = self
            .read_repo
            .find_by_id(query.id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("pastry not found"))?;

        let mut page = self
            .read_repo
            .search(&PastryQuery::similar_to(&reference, &search))
            .await?;

        // The cursor follows storage order, not the relevance order.
        let next = next_cursor(&page);
        rank_by_relevance(&reference, &mut page);
        self.into_page(requester, page, next).await
    }
}
