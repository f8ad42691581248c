use crate::storage::entity::{new_id, LegalDoc, LegalDocPatch, NewLegalDoc};
use crate::storage::{Store, StoreError};
use chrono::Utc;

pub struct LegalDocRepository;

impl LegalDocRepository {
    pub async fn get(store: &Store, id: &str) -> Option<LegalDoc> {
        store.legal_docs.get(id).await
    }

    pub async fn list_by_project(store: &Store, project_id: &str) -> Vec<LegalDoc> {
        store.legal_docs.filter(|d| d.project_id == project_id).await
    }

    pub async fn create(store: &Store, new: NewLegalDoc) -> Result<LegalDoc, StoreError> {
        store.legal_docs.insert(new.into_doc(new_id(), Utc::now())).await
    }

    pub async fn update(
        store: &Store,
        id: &str,
        patch: LegalDocPatch,
    ) -> Result<Option<LegalDoc>, StoreError> {
        store.legal_docs.update(id, patch).await
    }
}
