use crate::ai::{AdvisorService, AnyProvider};
use crate::import::ImportService;
use crate::query::QueryService;
use crate::storage::Store;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Log(String),
    Message(String),
    Error(String),
    Json { title: String, value: Value },
}

/// 命令处理依赖的全部服务。导入和 AI 顾问可选：未配置时对应命令返回错误事件
pub struct AppContext<P = AnyProvider> {
    pub store: Arc<Store>,
    pub query: QueryService,
    pub importer: Option<Arc<ImportService>>,
    pub advisor: Option<Arc<AdvisorService<P>>>,
    /// 本进程的对话 session，`ask` 的记录写在这里
    pub session_id: String,
}

impl<P> AppContext<P> {
    pub fn new(store: Arc<Store>, session_id: impl Into<String>) -> Self {
        Self {
            query: QueryService::new(store.clone()),
            store,
            importer: None,
            advisor: None,
            session_id: session_id.into(),
        }
    }

    pub fn with_importer(mut self, importer: Arc<ImportService>) -> Self {
        self.importer = Some(importer);
        self
    }

    pub fn with_advisor(mut self, advisor: Arc<AdvisorService<P>>) -> Self {
        self.advisor = Some(advisor);
        self
    }
}
