use crate::query::filters::VERIFIED_CREDIBILITY_THRESHOLD;
use crate::query::service::QueryService;
use crate::storage::entity::{InventoryStatus, Lead, ProjectStatus};
use crate::storage::repository::{
    BuilderRepository, LeadRepository, ProjectRepository, UnitRepository,
};
use crate::storage::StoreError;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;

/// 低于该分数且无 RERA 登记的项目视为不合规
pub const NON_COMPLIANT_THRESHOLD: u32 = 50;
pub const RECENT_LEAD_DAYS: i64 = 7;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_builders: usize,
    pub new_builders_this_month: usize,
    pub active_projects: usize,
    pub new_projects_this_month: usize,
    pub total_leads: usize,
    pub leads_this_week: usize,
    pub rera_compliant: usize,
    pub pending_review: usize,
    pub non_compliant: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub units_available: usize,
    pub units_sold: usize,
    pub total_leads: usize,
    pub new_leads_this_week: usize,
    pub rating: f64,
}

fn same_month(ts: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    ts.year() == now.year() && ts.month() == now.month()
}

fn within_days(ts: &DateTime<Utc>, now: &DateTime<Utc>, days: i64) -> bool {
    *ts >= *now - Duration::days(days)
}

impl QueryService {
    /// 管理后台总览，全部由当前存储计算得出
    pub async fn admin_stats(&self, now: DateTime<Utc>) -> AdminStats {
        let store = self.store();
        let builders = BuilderRepository::list(store).await;
        let projects = ProjectRepository::list(store).await;
        let leads = LeadRepository::list(store).await;

        let mut stats = AdminStats {
            total_builders: builders.len(),
            new_builders_this_month: builders
                .iter()
                .filter(|b| same_month(&b.created_at, &now))
                .count(),
            total_leads: leads.len(),
            leads_this_week: leads
                .iter()
                .filter(|l| within_days(&l.created_at, &now, RECENT_LEAD_DAYS))
                .count(),
            ..Default::default()
        };

        for p in &projects {
            if p.status != ProjectStatus::Ready {
                stats.active_projects += 1;
            }
            if same_month(&p.created_at, &now) {
                stats.new_projects_this_month += 1;
            }
            if p.has_rera() {
                stats.rera_compliant += 1;
            } else {
                if p.credibility_score < VERIFIED_CREDIBILITY_THRESHOLD {
                    stats.pending_review += 1;
                }
                if p.credibility_score < NON_COMPLIANT_THRESHOLD {
                    stats.non_compliant += 1;
                }
            }
        }
        stats
    }

    /// 开发商控制台指标；开发商不存在时返回 NotFound
    pub async fn builder_stats(
        &self,
        builder_id: &str,
        now: DateTime<Utc>,
    ) -> Result<BuilderStats, StoreError> {
        let store = self.store();
        let builder = BuilderRepository::get(store, builder_id)
            .await
            .ok_or_else(|| StoreError::not_found("builder", builder_id))?;

        let projects = ProjectRepository::list_by_builder(store, builder_id).await;
        let project_ids: Vec<String> = projects.iter().map(|p| p.id.clone()).collect();
        let units = UnitRepository::list_by_projects(store, &project_ids).await;
        let leads = self.leads_by_builder(builder_id).await;

        Ok(BuilderStats {
            total_projects: projects.len(),
            active_projects: projects
                .iter()
                .filter(|p| p.status != ProjectStatus::Ready)
                .count(),
            units_available: units
                .iter()
                .filter(|u| u.inventory_status == InventoryStatus::Available)
                .count(),
            units_sold: units
                .iter()
                .filter(|u| u.inventory_status == InventoryStatus::Sold)
                .count(),
            total_leads: leads.len(),
            new_leads_this_week: leads
                .iter()
                .filter(|l| within_days(&l.created_at, &now, RECENT_LEAD_DAYS))
                .count(),
            rating: builder.rating,
        })
    }

    pub async fn leads_by_builder(&self, builder_id: &str) -> Vec<Lead> {
        LeadRepository::list_by_builder(self.store(), builder_id).await
    }
}
