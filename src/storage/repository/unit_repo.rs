use crate::storage::entity::{new_id, NewUnit, Unit, UnitPatch};
use crate::storage::{Store, StoreError};
use chrono::Utc;

pub struct UnitRepository;

impl UnitRepository {
    pub async fn get(store: &Store, id: &str) -> Option<Unit> {
        store.units.get(id).await
    }

    pub async fn list_by_project(store: &Store, project_id: &str) -> Vec<Unit> {
        store.units.filter(|u| u.project_id == project_id).await
    }

    pub async fn list_by_projects(store: &Store, project_ids: &[String]) -> Vec<Unit> {
        store
            .units
            .filter(|u| project_ids.iter().any(|p| *p == u.project_id))
            .await
    }

    pub async fn create(store: &Store, new: NewUnit) -> Result<Unit, StoreError> {
        Self::create_with_id(store, new_id(), new).await
    }

    pub async fn create_with_id(
        store: &Store,
        id: impl Into<String>,
        new: NewUnit,
    ) -> Result<Unit, StoreError> {
        store.units.insert(new.into_unit(id.into(), Utc::now())).await
    }

    pub async fn update(
        store: &Store,
        id: &str,
        patch: UnitPatch,
    ) -> Result<Option<Unit>, StoreError> {
        store.units.update(id, patch).await
    }
}
