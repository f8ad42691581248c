use crate::storage::entity::{new_id, Lead, LeadPatch, NewLead};
use crate::storage::{Store, StoreError};
use chrono::Utc;

pub struct LeadRepository;

impl LeadRepository {
    pub async fn get(store: &Store, id: &str) -> Option<Lead> {
        store.leads.get(id).await
    }

    pub async fn list(store: &Store) -> Vec<Lead> {
        store.leads.all().await
    }

    pub async fn list_by_user(store: &Store, user_id: &str) -> Vec<Lead> {
        store
            .leads
            .filter(|l| l.user_id.as_deref() == Some(user_id))
            .await
    }

    pub async fn list_by_builder(store: &Store, builder_id: &str) -> Vec<Lead> {
        store
            .leads
            .filter(|l| l.builder_id.as_deref() == Some(builder_id))
            .await
    }

    pub async fn create(store: &Store, new: NewLead) -> Result<Lead, StoreError> {
        store.leads.insert(new.into_lead(new_id(), Utc::now())).await
    }

    pub async fn update(
        store: &Store,
        id: &str,
        patch: LeadPatch,
    ) -> Result<Option<Lead>, StoreError> {
        store.leads.update(id, patch).await
    }
}
