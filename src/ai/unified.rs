use crate::ai::openai::{self, OpenAiProvider};
use crate::ai::openrouter::{self, OpenRouterProvider};
use crate::ai::types::{ChatRequest, ChatResponse, LlmError, LlmProvider};
use async_trait::async_trait;

#[derive(Clone)]
pub enum InnerProvider {
    OpenRouter(OpenRouterProvider),
    OpenAi(OpenAiProvider),
}

/// 按 `LLM_PROVIDER` 选择的 provider；默认 openrouter
#[derive(Clone)]
pub struct AnyProvider {
    inner: InnerProvider,
    model: String,
}

impl AnyProvider {
    pub fn from_env() -> Result<Self, LlmError> {
        let which = std::env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| "openrouter".to_string())
            .to_lowercase();
        let model = std::env::var("LLM_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        match which.as_str() {
            "openai" => Ok(Self {
                inner: InnerProvider::OpenAi(OpenAiProvider::from_env()?),
                model: model.unwrap_or_else(|| openai::DEFAULT_MODEL.to_string()),
            }),
            _ => Ok(Self {
                inner: InnerProvider::OpenRouter(OpenRouterProvider::from_env()?),
                model: model.unwrap_or_else(|| openrouter::DEFAULT_MODEL.to_string()),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match &self.inner {
            InnerProvider::OpenRouter(_) => "openrouter",
            InnerProvider::OpenAi(_) => "openai",
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmProvider for AnyProvider {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
        match &self.inner {
            InnerProvider::OpenRouter(p) => p.chat(req).await,
            InnerProvider::OpenAi(p) => p.chat(req).await,
        }
    }
}
