pub mod advisor;
pub mod completion;
pub mod openai;
pub mod openrouter;
pub mod parser;
pub mod prompt;
pub mod types;
pub mod unified;

pub use advisor::{
    AdvisorAnswer, AdvisorContext, AdvisorError, AdvisorService, ComparisonPreferences,
    ComparisonReport, MarketInsights, PropertyCard,
};
pub use openai::OpenAiProvider;
pub use openrouter::OpenRouterProvider;
pub use types::{ChatRequest, ChatResponse, LlmError, LlmProvider};
pub use unified::AnyProvider;

/// `LLM_PROXY` 可以是完整代理 URL，也可以只写 host:port（按 socks5h 处理）
pub(crate) fn build_llm_http_client() -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder().timeout(std::time::Duration::from_secs(90));

    if let Ok(raw) = std::env::var("LLM_PROXY") {
        let t = raw.trim();
        if !t.is_empty() {
            let url = if t.contains("://") {
                t.to_string()
            } else {
                format!("socks5h://{}", t)
            };
            let proxy = reqwest::Proxy::all(&url).map_err(|e| LlmError::Http(e.to_string()))?;
            builder = builder.proxy(proxy);
        }
    }

    builder.build().map_err(|e| LlmError::Http(e.to_string()))
}
