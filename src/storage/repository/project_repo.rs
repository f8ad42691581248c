use crate::storage::entity::{new_id, NewProject, Project, ProjectPatch};
use crate::storage::{Store, StoreError};
use chrono::Utc;

pub struct ProjectRepository;

impl ProjectRepository {
    pub async fn get(store: &Store, id: &str) -> Option<Project> {
        store.projects.get(id).await
    }

    pub async fn exists(store: &Store, id: &str) -> bool {
        store.projects.contains(id).await
    }

    pub async fn list(store: &Store) -> Vec<Project> {
        store.projects.all().await
    }

    pub async fn list_by_builder(store: &Store, builder_id: &str) -> Vec<Project> {
        store.projects.filter(|p| p.builder_id == builder_id).await
    }

    pub async fn create(store: &Store, new: NewProject) -> Result<Project, StoreError> {
        Self::create_with_id(store, new_id(), new).await
    }

    /// 调用方指定 id（导入时用 `mt_<源 id>`），id 已存在返回 DuplicateKey
    pub async fn create_with_id(
        store: &Store,
        id: impl Into<String>,
        new: NewProject,
    ) -> Result<Project, StoreError> {
        store.projects.insert(new.into_project(id.into(), Utc::now())).await
    }

    pub async fn update(
        store: &Store,
        id: &str,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, StoreError> {
        store.projects.update(id, patch).await
    }

    pub async fn approve(store: &Store, id: &str) -> Result<Project, StoreError> {
        let patch = ProjectPatch {
            approved: Some(true),
            ..Default::default()
        };
        Self::update(store, id, patch)
            .await?
            .ok_or_else(|| StoreError::not_found("project", id))
    }
}
