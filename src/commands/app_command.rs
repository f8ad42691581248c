use crate::query::SearchFilters;
use crate::storage::entity::GeoType;
use std::str::FromStr;

pub const HELP: &str = "\
projects [k=v ...]            项目列表（city locality min max status verified rera credibility bhk）
search <text> [k=v ...]       文本搜索后再筛选
featured [n]                  可信度最高的 n 个项目（默认 10）
trending <city>               城市内热门片区 Top 5
builders [verified]           开发商，按评分降序
builder <id>                  开发商详情
console <builder_id>          开发商控制台指标
leads <builder_id>            开发商的线索
property <id>                 项目详情（含开发商 / 房源 / 优惠）
unit <id>                     房源详情
stats <geo> <city|locality|pincode>   市场统计
admin stats                   管理后台总览
verify <builder_id>           认证开发商
approve <project_id>          审核通过项目
import                        从外部数据源导入一批房源
ask <text>                    AI 顾问（当前会话记录对话）
compare <id> <id> [...]       AI 对比至少两个项目
insights <location> [timeframe]      AI 市场洞察（默认 6months）
history <session>             对话记录
help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Projects { filters: SearchFilters },
    Search { text: String, filters: SearchFilters },
    Featured { limit: Option<usize> },
    Trending { city: String },
    Builders { verified: Option<bool> },
    Builder { id: String },
    BuilderConsole { id: String },
    Leads { builder_id: String },
    Property { id: String },
    Unit { id: String },
    MarketStats { geo: String, geo_type: GeoType },
    AdminStats,
    Verify { builder_id: String },
    Approve { project_id: String },
    Import,
    Ask { text: String },
    Compare { ids: Vec<String> },
    Insights { location: String, timeframe: Option<String> },
    History { session: String },
    Help,
    Quit,
    Unknown(String),
}

fn required(parts: &[&str], usage: &str, build: impl FnOnce(String) -> AppCommand) -> AppCommand {
    match parts.get(1) {
        Some(v) => build(v.to_string()),
        None => AppCommand::Unknown(format!("用法: {usage}")),
    }
}

/// 把参数拆成自由文本与 key=value 过滤项
fn split_filters<'a>(args: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    args.iter().copied().partition(|a| !a.contains('='))
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Unknown("".to_string()));
        }

        let cmd = match parts[0] {
            "projects" | "p" => match SearchFilters::from_args(parts[1..].iter().copied()) {
                Ok(filters) => AppCommand::Projects { filters },
                Err(e) => AppCommand::Unknown(e.to_string()),
            },
            "search" | "s" => {
                let (words, args) = split_filters(&parts[1..]);
                match SearchFilters::from_args(args) {
                    Ok(filters) => AppCommand::Search {
                        text: words.join(" "),
                        filters,
                    },
                    Err(e) => AppCommand::Unknown(e.to_string()),
                }
            }
            "featured" => match parts.get(1) {
                None => AppCommand::Featured { limit: None },
                Some(n) => match n.parse::<usize>() {
                    Ok(n) => AppCommand::Featured { limit: Some(n) },
                    Err(_) => AppCommand::Unknown("用法: featured [n]".to_string()),
                },
            },
            "trending" => {
                let city = parts[1..].join(" ");
                if city.is_empty() {
                    AppCommand::Unknown("用法: trending <city>".to_string())
                } else {
                    AppCommand::Trending { city }
                }
            }
            "builders" => match parts.get(1).copied() {
                None => AppCommand::Builders { verified: None },
                Some("verified") => AppCommand::Builders {
                    verified: Some(true),
                },
                Some("unverified") => AppCommand::Builders {
                    verified: Some(false),
                },
                Some(_) => AppCommand::Unknown("用法: builders [verified|unverified]".to_string()),
            },
            "builder" => required(&parts, "builder <id>", |id| AppCommand::Builder { id }),
            "console" => required(&parts, "console <builder_id>", |id| {
                AppCommand::BuilderConsole { id }
            }),
            "leads" => required(&parts, "leads <builder_id>", |builder_id| {
                AppCommand::Leads { builder_id }
            }),
            "property" => required(&parts, "property <id>", |id| AppCommand::Property { id }),
            "unit" => required(&parts, "unit <id>", |id| AppCommand::Unit { id }),
            "stats" => match (parts.get(1), parts.get(2)) {
                (Some(geo), Some(kind)) => match kind.parse::<GeoType>() {
                    Ok(geo_type) => AppCommand::MarketStats {
                        geo: geo.to_string(),
                        geo_type,
                    },
                    Err(e) => AppCommand::Unknown(e.to_string()),
                },
                (Some(geo), None) => AppCommand::MarketStats {
                    geo: geo.to_string(),
                    geo_type: GeoType::City,
                },
                _ => AppCommand::Unknown("用法: stats <geo> <city|locality|pincode>".to_string()),
            },
            "admin" => match parts.get(1).copied() {
                Some("stats") => AppCommand::AdminStats,
                _ => AppCommand::Unknown("用法: admin stats".to_string()),
            },
            "verify" => required(&parts, "verify <builder_id>", |builder_id| {
                AppCommand::Verify { builder_id }
            }),
            "approve" => required(&parts, "approve <project_id>", |project_id| {
                AppCommand::Approve { project_id }
            }),
            "import" => AppCommand::Import,
            "ask" => {
                let text = parts[1..].join(" ");
                if text.is_empty() {
                    AppCommand::Unknown("用法: ask <text>".to_string())
                } else {
                    AppCommand::Ask { text }
                }
            }
            "compare" => {
                let ids: Vec<String> = parts[1..].iter().map(|s| s.to_string()).collect();
                if ids.len() < 2 {
                    AppCommand::Unknown("用法: compare <id> <id> [...]".to_string())
                } else {
                    AppCommand::Compare { ids }
                }
            }
            "insights" => match parts.get(1) {
                Some(location) => AppCommand::Insights {
                    location: location.to_string(),
                    timeframe: parts.get(2).map(|s| s.to_string()),
                },
                None => AppCommand::Unknown("用法: insights <location> [timeframe]".to_string()),
            },
            "history" => required(&parts, "history <session>", |session| {
                AppCommand::History { session }
            }),
            "help" | "h" => AppCommand::Help,
            "quit" | "q" | "exit" => AppCommand::Quit,
            other => AppCommand::Unknown(format!("未知命令: {other}")),
        };
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::entity::ProjectStatus;

    fn parse(s: &str) -> AppCommand {
        s.parse().unwrap()
    }

    #[test]
    fn projects_with_filters() {
        let AppCommand::Projects { filters } =
            parse("projects city=pune status=ready,launched rera=true bhk=2,3")
        else {
            panic!("expected projects");
        };
        assert_eq!(filters.city.as_deref(), Some("pune"));
        assert_eq!(
            filters.status,
            [ProjectStatus::Ready, ProjectStatus::Launched]
        );
        assert_eq!(filters.rera_approved, Some(true));
        assert_eq!(filters.bhk, [2, 3]);
    }

    #[test]
    fn search_splits_text_and_filters() {
        assert_eq!(
            parse("search lake view credibility=80"),
            AppCommand::Search {
                text: "lake view".to_string(),
                filters: SearchFilters {
                    credibility_min: Some(80),
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn bad_input_becomes_usage() {
        assert!(matches!(parse("projects status=sold"), AppCommand::Unknown(_)));
        assert!(matches!(parse("compare only-one"), AppCommand::Unknown(_)));
        assert!(matches!(parse("stats Pune district"), AppCommand::Unknown(_)));
        assert!(matches!(parse("frobnicate"), AppCommand::Unknown(_)));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("featured 3"), AppCommand::Featured { limit: Some(3) });
        assert_eq!(
            parse("trending New Delhi"),
            AppCommand::Trending {
                city: "New Delhi".to_string()
            }
        );
        assert_eq!(
            parse("stats Mumbai city"),
            AppCommand::MarketStats {
                geo: "Mumbai".to_string(),
                geo_type: GeoType::City
            }
        );
        assert_eq!(parse("admin stats"), AppCommand::AdminStats);
        assert_eq!(parse("q"), AppCommand::Quit);
    }
}
