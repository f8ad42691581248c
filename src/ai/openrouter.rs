use crate::ai::build_llm_http_client;
use crate::ai::completion;
use crate::ai::types::{ChatRequest, ChatResponse, LlmError, LlmProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// 逗号、分号或空白分隔的多个 key
pub(crate) fn split_keys(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[derive(Clone)]
pub struct OpenRouterProvider {
    client: reqwest::Client,
    base_url: String,
    api_keys: Vec<String>,
    index: Arc<AtomicUsize>,
}

impl OpenRouterProvider {
    pub fn from_env() -> Result<Self, LlmError> {
        let mut api_keys = std::env::var("OPENROUTER_API_KEYS")
            .map(|s| split_keys(&s))
            .unwrap_or_default();
        if api_keys.is_empty() {
            let key = std::env::var("OPENROUTER_API_KEY")
                .map_err(|_| LlmError::MissingEnv("OPENROUTER_API_KEY"))?;
            api_keys.push(key);
        }
        let base_url = std::env::var("OPENROUTER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(api_keys, base_url)
    }

    pub fn new(api_keys: Vec<String>, base_url: String) -> Result<Self, LlmError> {
        if api_keys.is_empty() {
            return Err(LlmError::MissingEnv("OPENROUTER_API_KEY"));
        }
        Ok(Self {
            client: build_llm_http_client()?,
            base_url,
            api_keys,
            index: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// 多 key 轮询
    fn next_key(&self) -> &str {
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        &self.api_keys[i % self.api_keys.len()]
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = completion::request_body(&req);
        completion::send(|| {
            self.client
                .post(&url)
                .bearer_auth(self.next_key())
                .header("Content-Type", "application/json")
                .header("X-Title", "ZyloEstate")
                .json(&body)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_key_lists() {
        assert_eq!(split_keys("a, b;c\n d"), ["a", "b", "c", "d"]);
        assert!(split_keys("  ").is_empty());
    }

    #[test]
    fn rotates_keys() {
        let p = OpenRouterProvider::new(
            vec!["k1".into(), "k2".into()],
            DEFAULT_BASE_URL.to_string(),
        )
        .unwrap();
        assert_eq!(p.next_key(), "k1");
        assert_eq!(p.next_key(), "k2");
        assert_eq!(p.next_key(), "k1");
        assert!(OpenRouterProvider::new(Vec::new(), DEFAULT_BASE_URL.into()).is_err());
    }
}
