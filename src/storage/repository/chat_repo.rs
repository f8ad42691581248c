use crate::storage::entity::{new_id, AiChatHistory, NewAiChatHistory};
use crate::storage::{Store, StoreError};
use chrono::Utc;

pub struct ChatHistoryRepository;

impl ChatHistoryRepository {
    pub async fn get(store: &Store, id: &str) -> Option<AiChatHistory> {
        store.chat_history.get(id).await
    }

    pub async fn append(
        store: &Store,
        new: NewAiChatHistory,
    ) -> Result<AiChatHistory, StoreError> {
        store
            .chat_history
            .insert(new.into_history(new_id(), Utc::now()))
            .await
    }

    /// 同一 session 的记录按创建时间排序；时间相同时保持写入顺序
    pub async fn list_by_session(store: &Store, session_id: &str) -> Vec<AiChatHistory> {
        let mut rows = store
            .chat_history
            .filter(|c| c.session_id == session_id)
            .await;
        rows.sort_by_key(|c| c.created_at);
        rows
    }
}
