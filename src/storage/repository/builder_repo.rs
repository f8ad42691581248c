use crate::storage::entity::{new_id, Builder, BuilderPatch, NewBuilder};
use crate::storage::{Store, StoreError};
use chrono::Utc;

pub struct BuilderRepository;

impl BuilderRepository {
    pub async fn get(store: &Store, id: &str) -> Option<Builder> {
        store.builders.get(id).await
    }

    /// 名称精确匹配（区分大小写），导入去重依赖这一点
    pub async fn find_by_name(store: &Store, name: &str) -> Option<Builder> {
        store.builders.find(|b| b.name == name).await
    }

    pub async fn list(store: &Store) -> Vec<Builder> {
        store.builders.all().await
    }

    pub async fn create(store: &Store, new: NewBuilder) -> Result<Builder, StoreError> {
        Self::create_with_id(store, new_id(), new).await
    }

    pub async fn create_with_id(
        store: &Store,
        id: impl Into<String>,
        new: NewBuilder,
    ) -> Result<Builder, StoreError> {
        store.builders.insert(new.into_builder(id.into(), Utc::now())).await
    }

    /// 名称已存在时返回 DuplicateKey { field: "name" }；检查与插入在同一把写锁内
    pub async fn create_unique_name(store: &Store, new: NewBuilder) -> Result<Builder, StoreError> {
        let builder = new.into_builder(new_id(), Utc::now());
        store
            .builders
            .insert_with(builder, |rows, candidate| {
                if rows.iter().any(|b| b.name == candidate.name) {
                    return Err(StoreError::duplicate("name", &candidate.name));
                }
                Ok(())
            })
            .await
    }

    pub async fn update(
        store: &Store,
        id: &str,
        patch: BuilderPatch,
    ) -> Result<Option<Builder>, StoreError> {
        store.builders.update(id, patch).await
    }

    pub async fn verify(store: &Store, id: &str) -> Result<Builder, StoreError> {
        let patch = BuilderPatch {
            verified: Some(true),
            ..Default::default()
        };
        Self::update(store, id, patch)
            .await?
            .ok_or_else(|| StoreError::not_found("builder", id))
    }

    /// 按当前存储中的项目数刷新 project_count；给出 rating 时一并更新
    pub async fn recompute_stats(
        store: &Store,
        id: &str,
        rating: Option<f64>,
    ) -> Result<Option<Builder>, StoreError> {
        let project_count = store.projects.count(|p| p.builder_id == id).await as u32;
        let patch = BuilderPatch {
            project_count: Some(project_count),
            rating,
            ..Default::default()
        };
        Self::update(store, id, patch).await
    }
}
