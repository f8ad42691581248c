use crate::storage::entity::{new_id, GeoType, MarketStat, MarketStatPatch, NewMarketStat};
use crate::storage::{Store, StoreError};
use chrono::Utc;

pub struct MarketStatRepository;

impl MarketStatRepository {
    pub async fn get(store: &Store, id: &str) -> Option<MarketStat> {
        store.market_stats.get(id).await
    }

    /// geo 与 geo_type 精确匹配，按 period 升序（YYYY-MM 字典序即时间序）
    pub async fn list_for_geo(store: &Store, geo: &str, geo_type: GeoType) -> Vec<MarketStat> {
        let mut stats = store
            .market_stats
            .filter(|s| s.geo == geo && s.geo_type == geo_type)
            .await;
        stats.sort_by(|a, b| a.period.cmp(&b.period));
        stats
    }

    pub async fn create(store: &Store, new: NewMarketStat) -> Result<MarketStat, StoreError> {
        Self::create_with_id(store, new_id(), new).await
    }

    pub async fn create_with_id(
        store: &Store,
        id: impl Into<String>,
        new: NewMarketStat,
    ) -> Result<MarketStat, StoreError> {
        store
            .market_stats
            .insert(new.into_stat(id.into(), Utc::now()))
            .await
    }

    pub async fn update(
        store: &Store,
        id: &str,
        patch: MarketStatPatch,
    ) -> Result<Option<MarketStat>, StoreError> {
        store.market_stats.update(id, patch).await
    }
}
