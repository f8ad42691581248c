use crate::query::filters::{contains_ignore_case, BuilderFilters, SearchFilters};
use crate::storage::entity::{Builder, GeoType, MarketStat, Offer, Project, Unit};
use crate::storage::repository::{
    BuilderRepository, MarketStatRepository, OfferRepository, ProjectRepository, UnitRepository,
};
use crate::storage::{Store, StoreError};
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_FEATURED_LIMIT: usize = 10;
pub const TRENDING_LOCALITY_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocalityTrend {
    pub locality: String,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropertyDetail {
    pub property: Project,
    pub builder: Option<Builder>,
    pub units: Vec<Unit>,
    pub offers: Vec<Offer>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnitDetail {
    pub unit: Unit,
    pub project: Option<Project>,
    pub builder: Option<Builder>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BuilderDetail {
    pub builder: Builder,
    pub projects: Vec<Project>,
    pub offers: Vec<Offer>,
}

/// 只读查询层：筛选、排序与聚合，从不修改存储。
#[derive(Clone)]
pub struct QueryService {
    store: Arc<Store>,
}

impl QueryService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// 满足全部筛选维度的项目，按 credibility_score 降序；同分保持写入顺序
    pub async fn projects(&self, filters: &SearchFilters) -> Result<Vec<Project>, StoreError> {
        filters.validate()?;
        let mut projects = self.store.projects.filter(|p| filters.matches(p)).await;
        sort_by_credibility(&mut projects);
        Ok(projects)
    }

    /// 先做文本匹配（名称 / 片区 / 城市 / 描述，不区分大小写），再在结果上应用筛选条件
    pub async fn search_properties(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<Project>, StoreError> {
        filters.validate()?;
        let term = query.trim();
        let mut projects = self
            .store
            .projects
            .filter(|p| (term.is_empty() || matches_text(p, term)) && filters.matches(p))
            .await;
        sort_by_credibility(&mut projects);
        Ok(projects)
    }

    /// 按 rating 数值降序
    pub async fn builders(&self, filters: &BuilderFilters) -> Vec<Builder> {
        let mut builders = self
            .store
            .builders
            .filter(|b| filters.verified.map_or(true, |v| b.verified == v))
            .await;
        builders.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        builders
    }

    pub async fn featured_projects(&self, limit: Option<usize>) -> Vec<Project> {
        let mut projects = self.store.projects.all().await;
        sort_by_credibility(&mut projects);
        projects.truncate(limit.unwrap_or(DEFAULT_FEATURED_LIMIT));
        projects
    }

    /// 城市内按片区计数，取前 5；计数相同按首次出现顺序。
    /// 城市名按 ASCII 忽略大小写匹配（"pune" 与 "Pune" 相同），片区名区分大小写。
    pub async fn trending_localities(&self, city: &str) -> Vec<LocalityTrend> {
        let city = city.trim();
        let projects = self
            .store
            .projects
            .filter(|p| p.city.eq_ignore_ascii_case(city))
            .await;

        let mut trends: Vec<LocalityTrend> = Vec::new();
        for p in &projects {
            match trends.iter_mut().find(|t| t.locality == p.locality) {
                Some(t) => t.count += 1,
                None => trends.push(LocalityTrend {
                    locality: p.locality.clone(),
                    count: 1,
                }),
            }
        }
        trends.sort_by(|a, b| b.count.cmp(&a.count));
        trends.truncate(TRENDING_LOCALITY_LIMIT);
        trends
    }

    pub async fn market_stats(&self, geo: &str, geo_type: GeoType) -> Vec<MarketStat> {
        MarketStatRepository::list_for_geo(&self.store, geo, geo_type).await
    }

    pub async fn property_detail(&self, id: &str) -> Option<PropertyDetail> {
        let property = ProjectRepository::get(&self.store, id).await?;
        let builder = BuilderRepository::get(&self.store, &property.builder_id).await;
        let units = UnitRepository::list_by_project(&self.store, &property.id).await;
        let offers = OfferRepository::list_by_project(&self.store, &property.id).await;
        Some(PropertyDetail {
            property,
            builder,
            units,
            offers,
        })
    }

    pub async fn unit_detail(&self, id: &str) -> Option<UnitDetail> {
        let unit = UnitRepository::get(&self.store, id).await?;
        let project = ProjectRepository::get(&self.store, &unit.project_id).await;
        let builder = match &project {
            Some(p) => BuilderRepository::get(&self.store, &p.builder_id).await,
            None => None,
        };
        Some(UnitDetail {
            unit,
            project,
            builder,
        })
    }

    pub async fn builder_detail(&self, id: &str) -> Option<BuilderDetail> {
        let builder = BuilderRepository::get(&self.store, id).await?;
        let projects = ProjectRepository::list_by_builder(&self.store, id).await;
        let offers = OfferRepository::list_by_builder(&self.store, id).await;
        Some(BuilderDetail {
            builder,
            projects,
            offers,
        })
    }
}

fn matches_text(p: &Project, term: &str) -> bool {
    contains_ignore_case(&p.name, term)
        || contains_ignore_case(&p.locality, term)
        || contains_ignore_case(&p.city, term)
        || p
            .description
            .as_deref()
            .is_some_and(|d| contains_ignore_case(d, term))
}

fn sort_by_credibility(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.credibility_score.cmp(&a.credibility_score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::entity::{NewProject, PriceBand, ProjectStatus};

    async fn add(store: &Store, name: &str, city: &str, locality: &str, score: u32) -> Project {
        let mut new = NewProject::new(
            name,
            "b1",
            city,
            locality,
            ProjectStatus::UnderConstruction,
            PriceBand::inr(10_000_000, 20_000_000),
        );
        new.credibility_score = Some(score);
        ProjectRepository::create(store, new).await.unwrap()
    }

    #[tokio::test]
    async fn trending_breaks_ties_by_first_seen() {
        let store = Arc::new(Store::new());
        add(&store, "A", "Pune", "Baner", 50).await;
        add(&store, "B", "Pune", "Wakad", 50).await;
        add(&store, "C", "Pune", "Wakad", 50).await;
        add(&store, "D", "Pune", "Kharadi", 50).await;
        add(&store, "E", "Mumbai", "Baner", 50).await;

        let q = QueryService::new(store);
        let trends = q.trending_localities("pune").await;
        let names: Vec<_> = trends.iter().map(|t| t.locality.as_str()).collect();
        assert_eq!(names, ["Wakad", "Baner", "Kharadi"]);
        assert_eq!(trends[0].count, 2);
        assert!(q.trending_localities("Chennai").await.is_empty());
    }

    #[tokio::test]
    async fn trending_caps_at_five() {
        let store = Arc::new(Store::new());
        for loc in ["L1", "L2", "L3", "L4", "L5", "L6", "L7"] {
            add(&store, loc, "Delhi", loc, 10).await;
        }
        let q = QueryService::new(store);
        assert_eq!(q.trending_localities("Delhi").await.len(), 5);
    }

    #[tokio::test]
    async fn featured_defaults_to_ten_and_sorts_by_score() {
        let store = Arc::new(Store::new());
        for i in 0..12u32 {
            add(&store, &format!("P{i}"), "Noida", "Sector 150", i * 5).await;
        }
        let q = QueryService::new(store);
        let featured = q.featured_projects(None).await;
        assert_eq!(featured.len(), 10);
        assert_eq!(featured[0].credibility_score, 55);
        assert!(featured
            .windows(2)
            .all(|w| w[0].credibility_score >= w[1].credibility_score));
        assert_eq!(q.featured_projects(Some(3)).await.len(), 3);
    }

    #[tokio::test]
    async fn search_applies_text_then_filters() {
        let store = Arc::new(Store::new());
        add(&store, "Lakeside Towers", "Bangalore", "Whitefield", 90).await;
        add(&store, "Lakeside Annex", "Bangalore", "Hebbal", 40).await;
        add(&store, "Hill View", "Bangalore", "Whitefield", 85).await;

        let q = QueryService::new(store);
        let filters = SearchFilters {
            credibility_min: Some(80),
            ..Default::default()
        };
        let found = q.search_properties("lakeside", &filters).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Lakeside Towers");

        let all = q.search_properties("", &filters).await.unwrap();
        assert_eq!(all, q.projects(&filters).await.unwrap());
    }
}
