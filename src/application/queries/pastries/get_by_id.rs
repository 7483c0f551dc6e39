use super::PastryQueryService;
use crate::{
    application::{
        dto::{AuthenticatedUser, PastryView},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{like::Like, pastry::PastryId, user::UserId},
};

pub struct GetPastryByIdQuery {
    pub id: PastryId,
}

impl PastryQueryService {
    /// `None` when the listing does not exist. The owner gets the owner view,
    /// everybody else the public one.
    pub async fn find_by_id(
        &self,
        requester: Option<&AuthenticatedUser>,
        query: GetPastryByIdQuery,
    ) -> ApplicationResult<Option<PastryView>> {
        let Some(pastry) = self.read_repo.find_by_id(query.id).await? else {
            return Ok(None);
        };

        let view = match requester {
            Some(user) if pastry.is_owned_by(user.id) => {
                PastryView::Owner(self.presenter.owner_view(pastry).await)
            }
            Some(user) => {
                let is_liked = self.likes.exists(Like::new(pastry.id, user.id)).await?;
                PastryView::Public(self.presenter.public_view(pastry, is_liked).await)
            }
            None => PastryView::Public(self.presenter.public_view(pastry, false).await),
        };
        Ok(Some(view))
    }

    pub async fn is_owned_by(&self, id: PastryId, user_id: UserId) -> ApplicationResult<bool> {
        let owner = self
            .read_repo
            .owner_of(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("pastry not found"))?;
        Ok(owner == user_id)
    }
}
