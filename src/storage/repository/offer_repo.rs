use crate::storage::entity::{new_id, NewOffer, Offer, OfferPatch};
use crate::storage::{Store, StoreError};
use chrono::Utc;

pub struct OfferRepository;

impl OfferRepository {
    pub async fn get(store: &Store, id: &str) -> Option<Offer> {
        store.offers.get(id).await
    }

    pub async fn list_by_builder(store: &Store, builder_id: &str) -> Vec<Offer> {
        store.offers.filter(|o| o.builder_id == builder_id).await
    }

    pub async fn list_by_project(store: &Store, project_id: &str) -> Vec<Offer> {
        store
            .offers
            .filter(|o| o.project_id.as_deref() == Some(project_id))
            .await
    }

    pub async fn create(store: &Store, new: NewOffer) -> Result<Offer, StoreError> {
        store.offers.insert(new.into_offer(new_id(), Utc::now())).await
    }

    pub async fn update(
        store: &Store,
        id: &str,
        patch: OfferPatch,
    ) -> Result<Option<Offer>, StoreError> {
        store.offers.update(id, patch).await
    }
}
