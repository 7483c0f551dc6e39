use super::{PastryQueryService, SearchCriteria};
use crate::{
    application::{
        dto::{AuthenticatedUser, CursorPage, PublicPastryDto},
        error::ApplicationResult,
    },
    domain::pastry::{PastryQuery, pagination::next_cursor},
};

pub struct SearchPastriesQuery {
    pub criteria: SearchCriteria,
}

impl PastryQueryService {
    pub async fn search(
        &self,
        requester: Option<&AuthenticatedUser>,
        query: SearchPastriesQuery,
    ) -> ApplicationResult<CursorPage<PublicPastryDto>> {
        let search = query.criteria.into_search()?;
        let page = self
            .read_repo
            .search(&PastryQuery::for_search(&search))
            .await?;

        tracing::debug!(returned = page.len(), "pastry search");
        let next = next_cursor(&page);
        self.into_page(requester, page, next).await
    }
}
