use crate::domain::errors::DomainResult;
use crate::domain::pastry::entity::{NewPastry, Pastry, PastryUpdate, PastryUpdateOutcome};
use crate::domain::pastry::query::PastryQuery;
use crate::domain::pastry::value_objects::PastryId;
use crate::domain::user::UserId;
use async_trait::async_trait;

#[async_trait]
pub trait PastryWriteRepository: Send + Sync {
    /// Persist the listing with its contact, geolocation, categories and
    /// media as one unit.
    async fn create(&self, pastry: NewPastry) -> DomainResult<Pastry>;

    async fn update(&self, update: PastryUpdate) -> DomainResult<PastryUpdateOutcome>;
}

#[async_trait]
pub trait PastryReadRepository: Send + Sync {
    async fn find_by_id(&self, id: PastryId) -> DomainResult<Option<Pastry>>;

    async fn search(&self, query: &PastryQuery) -> DomainResult<Vec<Pastry>>;

    async fn owner_of(&self, id: PastryId) -> DomainResult<Option<UserId>>;

    async fn exists(&self, id: PastryId) -> DomainResult<bool> {
        Ok(self.owner_of(id).await?.is_some())
    }
}
