use crate::ai::{AdvisorContext, ComparisonPreferences, LlmProvider};
use crate::app_state::{AppContext, AppEvent};
use crate::commands::{AppCommand, HELP};
use crate::query::BuilderFilters;
use crate::storage::repository::{BuilderRepository, ChatHistoryRepository, ProjectRepository};
use chrono::Utc;
use log::{error, info};
use serde::Serialize;
use tokio::sync::mpsc;

fn send_json<T: Serialize>(tx: &mpsc::UnboundedSender<AppEvent>, title: impl Into<String>, v: &T) {
    match serde_json::to_value(v) {
        Ok(value) => {
            let _ = tx.send(AppEvent::Json {
                title: title.into(),
                value,
            });
        }
        Err(e) => {
            let _ = tx.send(AppEvent::Error(format!("序列化失败: {e}")));
        }
    }
}

fn send_error(tx: &mpsc::UnboundedSender<AppEvent>, msg: String) {
    error!("{msg}");
    let _ = tx.send(AppEvent::Error(msg));
}

/// 执行一条命令，结果以事件形式发出。返回 false 表示应退出
pub async fn handle_command<P: LlmProvider>(
    ctx: &AppContext<P>,
    cmd: AppCommand,
    tx: &mpsc::UnboundedSender<AppEvent>,
) -> bool {
    match cmd {
        AppCommand::Projects { filters } => match ctx.query.projects(&filters).await {
            Ok(list) => send_json(tx, format!("projects ({})", list.len()), &list),
            Err(e) => send_error(tx, format!("筛选条件无效: {e}")),
        },
        AppCommand::Search { text, filters } => {
            match ctx.query.search_properties(&text, &filters).await {
                Ok(list) => send_json(tx, format!("search \"{text}\" ({})", list.len()), &list),
                Err(e) => send_error(tx, format!("筛选条件无效: {e}")),
            }
        }
        AppCommand::Featured { limit } => {
            let list = ctx.query.featured_projects(limit).await;
            send_json(tx, "featured", &list);
        }
        AppCommand::Trending { city } => {
            let trends = ctx.query.trending_localities(&city).await;
            send_json(tx, format!("trending in {city}"), &trends);
        }
        AppCommand::Builders { verified } => {
            let list = ctx.query.builders(&BuilderFilters { verified }).await;
            send_json(tx, format!("builders ({})", list.len()), &list);
        }
        AppCommand::Builder { id } => match ctx.query.builder_detail(&id).await {
            Some(d) => send_json(tx, format!("builder {id}"), &d),
            None => send_error(tx, format!("开发商不存在: {id}")),
        },
        AppCommand::BuilderConsole { id } => match ctx.query.builder_stats(&id, Utc::now()).await {
            Ok(stats) => send_json(tx, format!("console {id}"), &stats),
            Err(e) => send_error(tx, e.to_string()),
        },
        AppCommand::Leads { builder_id } => {
            let leads = ctx.query.leads_by_builder(&builder_id).await;
            send_json(tx, format!("leads for {builder_id} ({})", leads.len()), &leads);
        }
        AppCommand::Property { id } => match ctx.query.property_detail(&id).await {
            Some(d) => send_json(tx, format!("property {id}"), &d),
            None => send_error(tx, format!("项目不存在: {id}")),
        },
        AppCommand::Unit { id } => match ctx.query.unit_detail(&id).await {
            Some(d) => send_json(tx, format!("unit {id}"), &d),
            None => send_error(tx, format!("房源不存在: {id}")),
        },
        AppCommand::MarketStats { geo, geo_type } => {
            let stats = ctx.query.market_stats(&geo, geo_type).await;
            send_json(tx, format!("market {geo} ({geo_type})"), &stats);
        }
        AppCommand::AdminStats => {
            let stats = ctx.query.admin_stats(Utc::now()).await;
            send_json(tx, "admin stats", &stats);
        }
        AppCommand::Verify { builder_id } => {
            match BuilderRepository::verify(&ctx.store, &builder_id).await {
                Ok(b) => {
                    info!("builder verified: {}", b.id);
                    let _ = tx.send(AppEvent::Message(format!("已认证开发商: {}", b.name)));
                }
                Err(e) => send_error(tx, e.to_string()),
            }
        }
        AppCommand::Approve { project_id } => {
            match ProjectRepository::approve(&ctx.store, &project_id).await {
                Ok(p) => {
                    info!("project approved: {}", p.id);
                    let _ = tx.send(AppEvent::Message(format!("已审核通过项目: {}", p.name)));
                }
                Err(e) => send_error(tx, e.to_string()),
            }
        }
        AppCommand::Import => match &ctx.importer {
            Some(importer) => {
                let _ = tx.send(AppEvent::Log("开始导入外部房源...".to_string()));
                let report = importer.run().await;
                send_json(tx, "import", &report);
            }
            None => send_error(tx, "导入服务未配置".to_string()),
        },
        AppCommand::Ask { text } => match &ctx.advisor {
            Some(advisor) => {
                match advisor
                    .chat(&text, Some(&ctx.session_id), AdvisorContext::default())
                    .await
                {
                    Ok(answer) => send_json(tx, "advisor", &answer),
                    Err(e) => send_error(tx, format!("AI 顾问失败: {e}")),
                }
            }
            None => send_error(tx, "AI 顾问未配置（缺少 LLM key）".to_string()),
        },
        AppCommand::Compare { ids } => match &ctx.advisor {
            Some(advisor) => {
                match advisor.compare(&ids, &ComparisonPreferences::default()).await {
                    Ok(report) => send_json(tx, "comparison", &report),
                    Err(e) => send_error(tx, format!("对比失败: {e}")),
                }
            }
            None => send_error(tx, "AI 顾问未配置（缺少 LLM key）".to_string()),
        },
        AppCommand::Insights {
            location,
            timeframe,
        } => match &ctx.advisor {
            Some(advisor) => match advisor.market_insights(&location, timeframe.as_deref()).await {
                Ok(insights) => send_json(tx, format!("insights {location}"), &insights),
                Err(e) => send_error(tx, format!("市场洞察失败: {e}")),
            },
            None => send_error(tx, "AI 顾问未配置（缺少 LLM key）".to_string()),
        },
        AppCommand::History { session } => {
            let rows = ChatHistoryRepository::list_by_session(&ctx.store, &session).await;
            send_json(tx, format!("history {session} ({})", rows.len()), &rows);
        }
        AppCommand::Help => {
            let _ = tx.send(AppEvent::Message(HELP.to_string()));
        }
        AppCommand::Quit => return false,
        AppCommand::Unknown(msg) => {
            if !msg.is_empty() {
                let _ = tx.send(AppEvent::Error(msg));
            }
        }
    }
    true
}
