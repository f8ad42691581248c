use crate::import::feed::{FeedClient, RawListing};
use crate::import::mapper::{self, MappingConfig};
use crate::import::placeholder::PlaceholderGen;
use crate::storage::entity::{BuilderContact, FloorPlan, NewBuilder};
use crate::storage::repository::{BuilderRepository, ProjectRepository};
use crate::storage::{Store, StoreError};
use chrono::{Datelike, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const PLACEHOLDER_PHONE: &str = "+91-98765-43210";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub fetched: usize,
    pub imported: usize,
    pub skipped_existing: usize,
    pub skipped_invalid: usize,
    pub builders_created: usize,
}

pub struct ImportService {
    store: Arc<Store>,
    feed: FeedClient,
    mapping: MappingConfig,
    limit: Option<usize>,
    placeholder: Mutex<PlaceholderGen>,
}

impl ImportService {
    pub fn new(
        store: Arc<Store>,
        feed: FeedClient,
        mapping: MappingConfig,
        limit: Option<usize>,
        placeholder: PlaceholderGen,
    ) -> Self {
        Self {
            store,
            feed,
            mapping,
            limit,
            placeholder: Mutex::new(placeholder),
        }
    }

    /// 按名称精确匹配已有开发商；不存在时用占位数据新建。返回 (id, 是否新建)
    pub async fn resolve_builder(
        &self,
        name: &str,
        city: &str,
    ) -> Result<(String, bool), StoreError> {
        if let Some(b) = BuilderRepository::find_by_name(&self.store, name).await {
            return Ok((b.id, false));
        }

        let slug: String = name
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let (verified, rating) = {
            let mut rng = self.placeholder.lock().await;
            (rng.verified(), rng.rating())
        };
        let new = NewBuilder {
            verified: Some(verified),
            rating: Some(rating),
            contact: Some(BuilderContact {
                phone: Some(PLACEHOLDER_PHONE.to_string()),
                email: Some(format!("info@{slug}.com")),
                website: Some(format!("https://www.{slug}.com")),
            }),
            description: Some(format!(
                "Leading real estate developer specializing in premium projects in {city}"
            )),
            ..NewBuilder::named(name)
        };
        match BuilderRepository::create_unique_name(&self.store, new).await {
            Ok(builder) => {
                debug!("created builder {} for {}", builder.id, name);
                Ok((builder.id, true))
            }
            // 并发导入抢先建了同名开发商
            Err(StoreError::DuplicateKey { field: "name", .. }) => {
                BuilderRepository::find_by_name(&self.store, name)
                    .await
                    .map(|b| (b.id, false))
                    .ok_or_else(|| StoreError::not_found("builder", name))
            }
            Err(e) => Err(e),
        }
    }

    /// 逐条导入；单条失败只计数跳过，不影响其他记录
    pub async fn import_batch(&self, listings: Vec<RawListing>) -> ImportReport {
        let mut report = ImportReport {
            fetched: listings.len(),
            ..Default::default()
        };
        let current_year = Utc::now().year();
        let take = self.limit.unwrap_or(usize::MAX);
        let mut new_builders = Vec::new();

        for raw in listings.into_iter().take(take) {
            if !raw.is_importable() {
                debug!("skip listing without id or name: {:?}", raw.id);
                report.skipped_invalid += 1;
                continue;
            }
            let project_id = self.mapping.project_id(&raw.id);
            if ProjectRepository::exists(&self.store, &project_id).await {
                report.skipped_existing += 1;
                continue;
            }

            let city = raw.location(0).unwrap_or("Unknown");
            let builder_name = self.mapping.builder_name(&raw);
            let builder_id = match self.resolve_builder(builder_name, city).await {
                Ok((id, created)) => {
                    if created {
                        report.builders_created += 1;
                        new_builders.push(id.clone());
                    }
                    id
                }
                Err(e) => {
                    warn!("skip listing {}: builder {builder_name:?}: {e}", raw.id);
                    report.skipped_invalid += 1;
                    continue;
                }
            };

            let mut new = mapper::map_listing(&raw, &builder_id, current_year, &self.mapping);
            {
                let mut rng = self.placeholder.lock().await;
                new.featured = Some(rng.featured());
                let mut plans: Vec<FloorPlan> = Vec::new();
                for detail in &raw.type_detail {
                    let Some(bhk) = mapper::bhk_count(detail) else {
                        continue;
                    };
                    if plans.iter().any(|p| p.bhk == bhk) {
                        continue;
                    }
                    plans.push(FloorPlan {
                        bhk,
                        area: rng.carpet_area(detail),
                        price: new.price_band.min,
                        image_url: None,
                    });
                }
                new.floor_plans = Some(plans);
            }

            match ProjectRepository::create_with_id(&self.store, project_id.as_str(), new).await {
                Ok(_) => report.imported += 1,
                Err(StoreError::DuplicateKey { .. }) => report.skipped_existing += 1,
                Err(e) => {
                    warn!("skip listing {project_id}: {e}");
                    report.skipped_invalid += 1;
                }
            }
        }

        for id in &new_builders {
            if let Err(e) = BuilderRepository::recompute_stats(&self.store, id, None).await {
                warn!("recompute builder {id} failed: {e}");
            }
        }
        report
    }

    pub async fn run(&self) -> ImportReport {
        let listings = self.feed.fetch_listings().await;
        let report = self.import_batch(listings).await;
        info!(
            "import from {}: fetched={} imported={} existing={} invalid={} builders={}",
            self.feed.url(),
            report.fetched,
            report.imported,
            report.skipped_existing,
            report.skipped_invalid,
            report.builders_created
        );
        report
    }
}

/// 后台执行一次导入，调用方不必等待
pub fn spawn_import(service: Arc<ImportService>) -> JoinHandle<ImportReport> {
    tokio::spawn(async move { service.run().await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn service(store: Arc<Store>, limit: Option<usize>) -> ImportService {
        let feed = FeedClient::new("http://127.0.0.1:9/none", Duration::from_millis(200)).unwrap();
        ImportService::new(
            store,
            feed,
            MappingConfig::default(),
            limit,
            PlaceholderGen::from_seed(42),
        )
    }

    fn raw(id: &str, builder: &str) -> RawListing {
        RawListing {
            id: id.to_string(),
            name: format!("Project {id}"),
            builder: builder.to_string(),
            location: vec!["Mumbai".into(), "Andheri".into()],
            price: "Rs. 2 Cr".into(),
            type_detail: vec!["2 BHK".into(), "3 BHK".into(), "2 BHK Large".into()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn import_is_idempotent_and_dedups_builders() {
        let store = Arc::new(Store::new());
        let svc = service(store.clone(), None);

        let first = svc
            .import_batch(vec![raw("1", "Acme"), raw("2", "Acme"), raw("3", "Zen")])
            .await;
        assert_eq!(first.imported, 3);
        assert_eq!(first.builders_created, 2);

        let again = svc.import_batch(vec![raw("1", "Acme"), raw("4", "Acme")]).await;
        assert_eq!(again.imported, 1);
        assert_eq!(again.skipped_existing, 1);
        assert_eq!(again.builders_created, 0);

        assert_eq!(BuilderRepository::list(&store).await.len(), 2);
        let acme = BuilderRepository::find_by_name(&store, "Acme").await.unwrap();
        assert_eq!(acme.project_count, 2);
        assert_eq!(
            acme.contact.unwrap().email.as_deref(),
            Some("info@acme.com")
        );

        let p = ProjectRepository::get(&store, "mt_1").await.unwrap();
        assert_eq!(p.builder_id, acme.id);
        assert_eq!(p.state.as_deref(), Some("Maharashtra"));
        let bhks: Vec<u32> = p.floor_plans.iter().map(|f| f.bhk).collect();
        assert_eq!(bhks, [2, 3]);
    }

    #[tokio::test]
    async fn invalid_records_are_skipped() {
        let store = Arc::new(Store::new());
        let svc = service(store.clone(), None);
        let mut nameless = raw("9", "Acme");
        nameless.name = "  ".into();
        let report = svc
            .import_batch(vec![nameless, raw("", "Acme"), raw("10", "")])
            .await;
        assert_eq!(report.skipped_invalid, 2);
        assert_eq!(report.imported, 1);
        assert!(BuilderRepository::find_by_name(&store, "Unknown Builder")
            .await
            .is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_resolves_share_one_builder() {
        let store = Arc::new(Store::new());
        let svc = Arc::new(service(store.clone(), None));
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.resolve_builder("Acme", "Pune").await })
            })
            .collect();

        let mut resolved = Vec::new();
        for t in tasks {
            resolved.push(t.await.unwrap().unwrap());
        }
        assert_eq!(resolved.iter().filter(|(_, created)| *created).count(), 1);
        assert!(resolved.iter().all(|(id, _)| *id == resolved[0].0));
        assert_eq!(store.counts().await.builders, 1);
    }

    #[tokio::test]
    async fn oversized_price_does_not_break_batch() {
        let store = Arc::new(Store::new());
        let svc = service(store.clone(), None);
        let mut huge = raw("1", "Acme");
        huge.price = "Rs. 900000000000 Cr".into();
        let report = svc.import_batch(vec![huge, raw("2", "Acme")]).await;
        assert_eq!(report.imported, 2);

        let p = ProjectRepository::get(&store, "mt_1").await.unwrap();
        assert_eq!(p.price_band.min, 30_000_000);
        assert_eq!(p.price_band.max, 150_000_000);
    }

    #[tokio::test]
    async fn limit_caps_batch() {
        let store = Arc::new(Store::new());
        let svc = service(store.clone(), Some(2));
        let report = svc
            .import_batch((1..=5).map(|i| raw(&i.to_string(), "Acme")).collect())
            .await;
        assert_eq!(report.fetched, 5);
        assert_eq!(report.imported, 2);
    }

    #[tokio::test]
    async fn unreachable_feed_imports_nothing() {
        let store = Arc::new(Store::new());
        let report = spawn_import(Arc::new(service(store.clone(), None)))
            .await
            .unwrap();
        assert_eq!(report, ImportReport::default());
        assert_eq!(store.counts().await.projects, 0);
    }
}
