//! AI 顾问：把存储中的项目快照拼进提示词，调用模型并解析 JSON 回答。
//! 除对话记录外不写存储。

use crate::ai::parser::{extract_json_object, number_field, string_field, string_list};
use crate::ai::prompt;
use crate::ai::types::{ChatRequest, LlmError, LlmProvider};
use crate::query::QueryService;
use crate::storage::entity::{ChatContext, GeoType, NewAiChatHistory, Project, Purpose};
use crate::storage::repository::{ChatHistoryRepository, MarketStatRepository, ProjectRepository};
use crate::storage::{Store, StoreError};
use futures::future::join_all;
use log::{debug, warn};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub const DISCLAIMER: &str = "AI-generated guidance, not financial or legal advice. Verify RERA \
     registration, title documents and pricing with the builder before committing.";
pub const FALLBACK_ANSWER: &str = "I'm experiencing technical difficulties right now. Please try \
     again in a moment, or contact our support team for immediate assistance.";
pub const UNREADABLE_ANSWER: &str =
    "I apologize, but I couldn't process your query. Please try rephrasing your question.";
pub const DEFAULT_TIMEFRAME: &str = "6months";
pub const MIN_COMPARE: usize = 2;
const CONTEXT_FEATURED: usize = 5;

#[derive(thiserror::Error, Debug)]
pub enum AdvisorError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("need at least {required} existing properties to compare, found {found}")]
    InsufficientProperties { found: usize, required: usize },
    #[error("model answer is not a JSON object")]
    UnreadableAnswer,
}

#[derive(Clone, Debug, Default)]
pub struct AdvisorContext {
    pub property_ids: Vec<String>,
    pub search_filters: Option<Value>,
    pub language: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCard {
    pub property_id: String,
    pub relevance_score: f64,
    pub reasoning: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorAnswer {
    pub answer: String,
    pub cards: Vec<PropertyCard>,
    pub actions: Vec<String>,
    pub confidence: f64,
    pub disclaimer: String,
    pub intent: String,
    pub follow_up_questions: Vec<String>,
}

impl AdvisorAnswer {
    pub fn fallback() -> Self {
        Self {
            answer: FALLBACK_ANSWER.to_string(),
            cards: Vec::new(),
            actions: Vec::new(),
            confidence: 0.0,
            disclaimer: DISCLAIMER.to_string(),
            intent: "error".to_string(),
            follow_up_questions: vec![
                "What type of property are you looking for?".to_string(),
                "What's your budget range?".to_string(),
                "Which city interests you?".to_string(),
            ],
        }
    }

    fn from_json(obj: &Map<String, Value>) -> Self {
        let cards: Vec<PropertyCard> = match obj.get("properties") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_object())
                .filter_map(|c| {
                    Some(PropertyCard {
                        property_id: string_field(c, "property_id")
                            .or_else(|| string_field(c, "id"))?,
                        relevance_score: number_field(c, "relevance_score")
                            .unwrap_or(0.0)
                            .clamp(0.0, 1.0),
                        reasoning: string_field(c, "reasoning").unwrap_or_default(),
                        pros: string_list(c, "pros"),
                        cons: string_list(c, "cons"),
                    })
                })
                .collect(),
            _ => Vec::new(),
        };
        let mut actions = string_list(obj, "actions");
        if actions.is_empty() {
            actions = cards
                .iter()
                .map(|c| format!("view_property:{}", c.property_id))
                .collect();
        }
        Self {
            answer: string_field(obj, "response")
                .or_else(|| string_field(obj, "answer"))
                .unwrap_or_else(|| UNREADABLE_ANSWER.to_string()),
            cards,
            actions,
            confidence: number_field(obj, "confidence")
                .unwrap_or(0.5)
                .clamp(0.0, 1.0),
            disclaimer: DISCLAIMER.to_string(),
            intent: string_field(obj, "intent").unwrap_or_else(|| "general".to_string()),
            follow_up_questions: string_list(obj, "follow_up_questions"),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ComparisonPreferences {
    pub budget: Option<i64>,
    pub purpose: Option<Purpose>,
    pub priorities: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub recommendation: String,
    pub winner: Option<String>,
    pub comparison_matrix: Value,
    pub investment_analysis: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsights {
    pub location: String,
    pub timeframe: String,
    pub trends: Value,
    pub forecast: Value,
    pub insights: Vec<String>,
    pub investment_outlook: String,
}

fn project_snapshot(p: &Project) -> Value {
    json!({
        "id": p.id,
        "name": p.name,
        "builderId": p.builder_id,
        "city": p.city,
        "locality": p.locality,
        "status": p.status,
        "priceBand": p.price_band,
        "credibilityScore": p.credibility_score,
        "reraId": p.rera_id,
        "possessionDate": p.possession_date,
        "amenities": p.amenities,
        "connectivity": p.connectivity,
        "highlights": p.highlights,
        "floorPlans": p.floor_plans,
    })
}

pub struct AdvisorService<P> {
    provider: P,
    model: String,
    store: Arc<Store>,
    query: QueryService,
}

impl<P: LlmProvider> AdvisorService<P> {
    pub fn new(provider: P, model: impl Into<String>, store: Arc<Store>) -> Self {
        let query = QueryService::new(store.clone());
        Self {
            provider,
            model: model.into(),
            store,
            query,
        }
    }

    async fn snapshot(&self, ids: &[String]) -> Vec<Project> {
        if ids.is_empty() {
            return self.query.featured_projects(Some(CONTEXT_FEATURED)).await;
        }
        let mut out = Vec::new();
        for id in ids {
            if out.iter().any(|p: &Project| &p.id == id) {
                continue;
            }
            if let Some(p) = ProjectRepository::get(&self.store, id).await {
                out.push(p);
            }
        }
        out
    }

    async fn ask_json(&self, req: ChatRequest) -> Result<Map<String, Value>, AdvisorError> {
        let resp = self.provider.chat(req).await?;
        debug!("advisor raw answer: {}", resp.text);
        extract_json_object(&resp.text).ok_or(AdvisorError::UnreadableAnswer)
    }

    /// 模型失败时返回 confidence 为 0 的兜底回答；给出 session 时记录本次对话
    pub async fn chat(
        &self,
        query: &str,
        session_id: Option<&str>,
        ctx: AdvisorContext,
    ) -> Result<AdvisorAnswer, AdvisorError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StoreError::invalid("query must not be empty").into());
        }
        let language = ctx.language.clone().unwrap_or_else(|| "English".to_string());
        let properties = self.snapshot(&ctx.property_ids).await;
        let context = json!({
            "properties": properties.iter().map(project_snapshot).collect::<Vec<_>>(),
            "searchFilters": ctx.search_filters,
            "language": language,
            "userId": ctx.user_id,
        });

        let req = ChatRequest::json(
            &self.model,
            prompt::advisor_system(&context),
            prompt::advisor_user(query, &language),
        );
        let answer = match self.ask_json(req).await {
            Ok(obj) => AdvisorAnswer::from_json(&obj),
            Err(e) => {
                warn!("advisor chat failed, using fallback: {e}");
                AdvisorAnswer::fallback()
            }
        };

        if let Some(session_id) = session_id {
            let entry = NewAiChatHistory {
                session_id: session_id.to_string(),
                user_id: ctx.user_id,
                query: query.to_string(),
                response: answer.answer.clone(),
                context: Some(ChatContext {
                    properties: properties.into_iter().map(|p| p.id).collect(),
                    search_filters: ctx.search_filters,
                    language: ctx.language,
                }),
            };
            ChatHistoryRepository::append(&self.store, entry).await?;
        }
        Ok(answer)
    }

    pub async fn compare(
        &self,
        property_ids: &[String],
        preferences: &ComparisonPreferences,
    ) -> Result<ComparisonReport, AdvisorError> {
        let mut details = Vec::new();
        if !property_ids.is_empty() {
            let projects = self.snapshot(property_ids).await;
            let lookups = projects.iter().map(|p| self.query.property_detail(&p.id));
            details.extend(join_all(lookups).await.into_iter().flatten());
        }
        if details.len() < MIN_COMPARE {
            return Err(AdvisorError::InsufficientProperties {
                found: details.len(),
                required: MIN_COMPARE,
            });
        }

        let properties: Vec<Value> = details
            .iter()
            .map(|d| {
                let mut v = project_snapshot(&d.property);
                v["builder"] = json!(d.builder.as_ref().map(|b| json!({
                    "name": b.name,
                    "verified": b.verified,
                    "rating": b.rating,
                })));
                v["units"] = json!(d.units);
                v
            })
            .collect();
        let req = ChatRequest::json(
            &self.model,
            "You are ZyloAI, an expert Indian real estate analyst. Answer with JSON only.",
            prompt::comparison(&json!(properties), &json!(preferences)),
        )
        .with_temperature(0.3)
        .with_max_tokens(2000);

        let obj = self.ask_json(req).await?;
        let winner = string_field(&obj, "winner")
            .filter(|w| details.iter().any(|d| &d.property.id == w));
        Ok(ComparisonReport {
            recommendation: string_field(&obj, "recommendation").unwrap_or_default(),
            winner,
            comparison_matrix: obj.get("comparison_matrix").cloned().unwrap_or(Value::Null),
            investment_analysis: obj
                .get("investment_analysis")
                .cloned()
                .unwrap_or(Value::Null),
        })
    }

    pub async fn market_insights(
        &self,
        location: &str,
        timeframe: Option<&str>,
    ) -> Result<MarketInsights, AdvisorError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(StoreError::invalid("location must not be empty").into());
        }
        let timeframe = timeframe
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TIMEFRAME);

        let mut stats = Vec::new();
        for geo_type in [GeoType::City, GeoType::Locality, GeoType::Pincode] {
            stats.extend(MarketStatRepository::list_for_geo(&self.store, location, geo_type).await);
        }
        let req = ChatRequest::json(
            &self.model,
            "You are ZyloAI, an expert Indian real estate market analyst. Answer with JSON only.",
            prompt::market(location, timeframe, &json!(stats)),
        )
        .with_temperature(0.4);

        let obj = self.ask_json(req).await?;
        Ok(MarketInsights {
            location: location.to_string(),
            timeframe: timeframe.to_string(),
            trends: obj.get("trends").cloned().unwrap_or(Value::Null),
            forecast: obj.get("forecast").cloned().unwrap_or(Value::Null),
            insights: string_list(&obj, "insights"),
            investment_outlook: string_field(&obj, "investment_outlook").unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::ChatResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeProvider {
        reply: Option<String>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl FakeProvider {
        fn answering(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for FakeProvider {
        async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
            self.seen.lock().unwrap().push(req);
            match &self.reply {
                Some(text) => Ok(ChatResponse {
                    text: text.clone(),
                    raw: None,
                }),
                None => Err(LlmError::RateLimited),
            }
        }
    }

    async fn seeded() -> Arc<Store> {
        Arc::new(Store::with_sample_data().await.unwrap())
    }

    #[tokio::test]
    async fn chat_parses_answer_and_logs_history() {
        let store = seeded().await;
        let provider = FakeProvider::answering(
            r#"```json
{"response": "Whitefield suits IT commuters.", "intent": "search", "confidence": 0.9,
 "properties": [{"property_id": "project-prestige-lakeside", "relevance_score": 0.95,
                 "reasoning": "near IT parks", "pros": ["lake"], "cons": []}],
 "follow_up_questions": ["Budget?"]}
```"#,
        );
        let advisor = AdvisorService::new(provider, "test-model", store.clone());
        let ctx = AdvisorContext {
            property_ids: vec!["project-prestige-lakeside".into(), "missing".into()],
            ..Default::default()
        };
        let answer = advisor.chat("2BHK near Whitefield", Some("s1"), ctx).await.unwrap();
        assert_eq!(answer.intent, "search");
        assert_eq!(answer.confidence, 0.9);
        assert_eq!(answer.cards.len(), 1);
        assert_eq!(answer.actions, ["view_property:project-prestige-lakeside"]);

        let seen = advisor.provider.seen.lock().unwrap();
        assert!(seen[0].json_mode);
        assert!(seen[0].system.contains("Prestige Lakeside Habitat"));
        assert!(!seen[0].system.contains("Godrej Reserve"));
        drop(seen);

        let history = ChatHistoryRepository::list_by_session(&store, "s1").await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].response, "Whitefield suits IT commuters.");
        assert_eq!(
            history[0].context.as_ref().unwrap().properties,
            ["project-prestige-lakeside"]
        );
    }

    #[tokio::test]
    async fn chat_falls_back_on_provider_error() {
        let store = seeded().await;
        let advisor = AdvisorService::new(FakeProvider::failing(), "m", store.clone());
        let answer = advisor
            .chat("anything", Some("s2"), AdvisorContext::default())
            .await
            .unwrap();
        assert_eq!(answer.confidence, 0.0);
        assert_eq!(answer.intent, "error");
        assert_eq!(ChatHistoryRepository::list_by_session(&store, "s2").await.len(), 1);

        let no_session = advisor.chat("again", None, AdvisorContext::default()).await;
        assert!(no_session.is_ok());
        assert_eq!(store.counts().await.chat_history, 1);
    }

    #[tokio::test]
    async fn compare_requires_two_existing_properties() {
        let store = seeded().await;
        let advisor = AdvisorService::new(FakeProvider::answering("{}"), "m", store);
        let err = advisor
            .compare(
                &["project-dlf-privana".into(), "nope".into()],
                &ComparisonPreferences::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::InsufficientProperties { found: 1, required: 2 }
        ));
    }

    #[tokio::test]
    async fn compare_keeps_known_winner_only() {
        let store = seeded().await;
        let advisor = AdvisorService::new(
            FakeProvider::answering(
                r#"{"recommendation": "Reserve for appreciation", "winner": "project-godrej-reserve",
                    "comparison_matrix": {"pricePerSqft": {}}, "investment_analysis": {"risk": "low"}}"#,
            ),
            "m",
            store,
        );
        let ids = vec!["project-dlf-privana".to_string(), "project-godrej-reserve".to_string()];
        let report = advisor
            .compare(&ids, &ComparisonPreferences::default())
            .await
            .unwrap();
        assert_eq!(report.winner.as_deref(), Some("project-godrej-reserve"));
        assert_eq!(report.investment_analysis["risk"], "low");
    }

    #[tokio::test]
    async fn market_insights_use_stored_stats() {
        let store = seeded().await;
        let advisor = AdvisorService::new(
            FakeProvider::answering(
                r#"{"trends": {"yoy": 12.5}, "insights": ["Demand strong"], "investment_outlook": "Positive"}"#,
            ),
            "m",
            store,
        );
        let insights = advisor.market_insights("Bangalore", None).await.unwrap();
        assert_eq!(insights.timeframe, "6months");
        assert_eq!(insights.insights, ["Demand strong"]);
        assert_eq!(insights.forecast, Value::Null);
        let seen = advisor.provider.seen.lock().unwrap();
        assert!(seen[0].user.contains("market-bangalore-2024-08"));
    }
}
