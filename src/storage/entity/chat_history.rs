use super::{require_non_empty, Record, Validate};
use crate::storage::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub search_filters: Option<Value>,
    #[serde(default)]
    pub language: Option<String>,
}

/// AI 对话记录，只追加，按 session 聚合、按创建时间排序。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiChatHistory {
    pub id: String,
    pub session_id: String,
    pub user_id: Option<String>,
    pub query: String,
    pub response: String,
    pub context: Option<ChatContext>,
    pub created_at: DateTime<Utc>,
}

impl Record for AiChatHistory {
    const ENTITY: &'static str = "ai_chat_history";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for AiChatHistory {
    fn validate(&self) -> Result<(), StoreError> {
        require_non_empty("chat.sessionId", &self.session_id)?;
        require_non_empty("chat.query", &self.query)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAiChatHistory {
    pub session_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub query: String,
    pub response: String,
    #[serde(default)]
    pub context: Option<ChatContext>,
}

impl NewAiChatHistory {
    pub fn into_history(self, id: String, now: DateTime<Utc>) -> AiChatHistory {
        AiChatHistory {
            id,
            session_id: self.session_id,
            user_id: self.user_id,
            query: self.query,
            response: self.response,
            context: self.context,
            created_at: now,
        }
    }
}
