use crate::storage::entity::{
    AiChatHistory, Builder, Lead, LegalDoc, MarketStat, Offer, Project, Unit, User,
};
use crate::storage::table::Table;
use log::info;

/// 全部实体的内存存储。显式构造、以 `Arc<Store>` 注入各个服务，drop 即销毁。
#[derive(Default)]
pub struct Store {
    pub(crate) users: Table<User>,
    pub(crate) builders: Table<Builder>,
    pub(crate) projects: Table<Project>,
    pub(crate) units: Table<Unit>,
    pub(crate) offers: Table<Offer>,
    pub(crate) market_stats: Table<MarketStat>,
    pub(crate) legal_docs: Table<LegalDoc>,
    pub(crate) leads: Table<Lead>,
    pub(crate) chat_history: Table<AiChatHistory>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub users: usize,
    pub builders: usize,
    pub projects: usize,
    pub units: usize,
    pub offers: usize,
    pub market_stats: usize,
    pub legal_docs: usize,
    pub leads: usize,
    pub chat_history: usize,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// 空存储 + 内置示例目录
    pub async fn with_sample_data() -> Result<Self, crate::storage::StoreError> {
        let store = Self::new();
        crate::seed::load_sample_data(&store).await?;
        let counts = store.counts().await;
        info!(
            "示例数据已加载: builders={}, projects={}, units={}, market_stats={}",
            counts.builders, counts.projects, counts.units, counts.market_stats
        );
        Ok(store)
    }

    pub async fn counts(&self) -> StoreCounts {
        StoreCounts {
            users: self.users.len().await,
            builders: self.builders.len().await,
            projects: self.projects.len().await,
            units: self.units.len().await,
            offers: self.offers.len().await,
            market_stats: self.market_stats.len().await,
            legal_docs: self.legal_docs.len().await,
            leads: self.leads.len().await,
            chat_history: self.chat_history.len().await,
        }
    }
}
