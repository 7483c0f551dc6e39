use std::{collections::HashSet, sync::Arc};

use crate::{
    application::{
        dto::{AuthenticatedUser, CursorPage, PublicPastryDto},
        error::ApplicationResult,
    },
    domain::{
        like::LikeRepository,
        pastry::{Pastry, PastryId, PastryReadRepository},
    },
};

use super::PastryPresenter;

pub struct PastryQueryService {
    pub(super) read_repo: Arc<dyn PastryReadRepository>,
    pub(super) likes: Arc<dyn LikeRepository>,
    pub(super) presenter: Arc<PastryPresenter>,
}

impl PastryQueryService {
    pub fn new(
        read_repo: Arc<dyn PastryReadRepository>,
        likes: Arc<dyn LikeRepository>,
        presenter: Arc<PastryPresenter>,
    ) -> Self {
        Self {
            read_repo,
            likes,
            presenter,
        }
    }

    pub(super) async fn into_page(
        &self,
        requester: Option<&AuthenticatedUser>,
        page: Vec<Pastry>,
        next: Option<PastryId>,
    ) -> ApplicationResult<CursorPage<PublicPastryDto>> {
        let liked = self.liked_in(requester, &page).await?;
        let data = self.presenter.public_page(page, &liked).await;
        Ok(CursorPage::new(data, next.map(|id| id.to_string())))
    }

    async fn liked_in(
        &self,
        requester: Option<&AuthenticatedUser>,
        page: &[Pastry],
    ) -> ApplicationResult<HashSet<PastryId>> {
        let Some(user) = requester else {
            return Ok(HashSet::new());
        };
        if page.is_empty() {
            return Ok(HashSet::new());
        }
        let ids: Vec<PastryId> = page.iter().map(|pastry| pastry.id).collect();
        Ok(self.likes.liked_among(user.id, &ids).await?)
    }
}
